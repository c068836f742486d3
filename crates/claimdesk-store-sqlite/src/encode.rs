//! Decoding helpers between SQLite's plain-text column values and the
//! domain types.
//!
//! `recorded_at` is assigned by SQLite's `CURRENT_TIMESTAMP`, which yields
//! second-precision UTC in `YYYY-MM-DD HH:MM:SS` form. Rows are read by
//! column name, never by positional index, to keep the row-reading contract
//! uniform with the networked backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use claimdesk_core::{
  claim::Claim,
  recommendation::{Category, Priority, Recommendation},
};

use crate::{Error, Result};

pub fn decode_ts(s: &str) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `claims` row.
pub struct RawClaim {
  pub id:              i64,
  pub recorded_at:     String,
  pub claim_text:      String,
  pub loss_type:       String,
  pub severity:        String,
  pub affected_assets: String,
  pub estimated_loss:  String,
  pub incident_date:   String,
  pub location:        String,
  pub confidence:      String,
  pub explanation:     String,
}

impl RawClaim {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get("id")?,
      recorded_at:     row.get("recorded_at")?,
      claim_text:      row.get("claim_text")?,
      loss_type:       row.get("loss_type")?,
      severity:        row.get("severity")?,
      affected_assets: row.get("affected_assets")?,
      estimated_loss:  row.get("estimated_loss")?,
      incident_date:   row.get("incident_date")?,
      location:        row.get("location")?,
      confidence:      row.get("confidence")?,
      explanation:     row.get("explanation")?,
    })
  }

  pub fn into_claim(self) -> Result<Claim> {
    Ok(Claim {
      id:              self.id,
      recorded_at:     decode_ts(&self.recorded_at)?,
      claim_text:      self.claim_text,
      loss_type:       self.loss_type,
      severity:        self.severity,
      affected_assets: self.affected_assets,
      estimated_loss:  self.estimated_loss,
      incident_date:   self.incident_date,
      location:        self.location,
      confidence:      self.confidence,
      explanation:     self.explanation,
    })
  }
}

/// Raw values read directly from a `claim_recommendations` row.
pub struct RawRecommendation {
  pub id:        i64,
  pub claim_id:  i64,
  pub action:    String,
  pub priority:  String,
  pub category:  String,
  pub icon:      Option<String>,
  pub reasoning: String,
}

impl RawRecommendation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get("id")?,
      claim_id:  row.get("claim_id")?,
      action:    row.get("action")?,
      priority:  row.get("priority")?,
      category:  row.get("category")?,
      icon:      row.get("icon")?,
      reasoning: row.get("reasoning")?,
    })
  }

  pub fn into_recommendation(self) -> Result<Recommendation> {
    let priority = Priority::parse(&self.priority).ok_or_else(|| {
      Error::Decode(format!("unknown priority: {:?}", self.priority))
    })?;
    let category = Category::parse(&self.category).ok_or_else(|| {
      Error::Decode(format!("unknown category: {:?}", self.category))
    })?;

    Ok(Recommendation {
      id: self.id,
      claim_id: self.claim_id,
      action: self.action,
      priority,
      category,
      icon: self.icon,
      reasoning: self.reasoning,
    })
  }
}
