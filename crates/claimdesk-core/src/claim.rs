//! Claim types — the unit of storage for the claim history.
//!
//! A claim is written once, on successful extraction, and never updated in
//! place. Classification fields are free text produced by the extraction
//! step; absence is represented as the empty string, never as NULL, so
//! readers see a single "missing" shape on both backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Claim ───────────────────────────────────────────────────────────────────

/// A normalized claim as persisted by a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
  /// Backend-assigned identifier; unique and monotonically increasing in
  /// creation order within one backend.
  pub id:              i64,
  /// Store-assigned creation instant; never changes after insertion.
  pub recorded_at:     DateTime<Utc>,
  /// The original unstructured input. Required, non-empty.
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

impl Claim {
  /// Flatten into the backend-independent export shape.
  pub fn into_export(self) -> ClaimExport {
    ClaimExport {
      id:              self.id,
      recorded_at:     self.recorded_at.to_rfc3339(),
      claim_text:      self.claim_text,
      loss_type:       self.loss_type,
      severity:        self.severity,
      affected_assets: self.affected_assets,
      estimated_loss:  self.estimated_loss,
      incident_date:   self.incident_date,
      location:        self.location,
      confidence:      self.confidence,
      explanation:     self.explanation,
    }
  }
}

// ─── NewClaim ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ClaimStore::create_claim`].
/// `id` and `recorded_at` are always assigned by the store; they are not
/// accepted from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
  pub claim_text:      String,
  #[serde(default)]
  pub loss_type:       String,
  #[serde(default)]
  pub severity:        String,
  #[serde(default)]
  pub affected_assets: String,
  #[serde(default)]
  pub estimated_loss:  String,
  #[serde(default)]
  pub incident_date:   String,
  #[serde(default)]
  pub location:        String,
  #[serde(default)]
  pub confidence:      String,
  #[serde(default)]
  pub explanation:     String,
}

impl NewClaim {
  /// Convenience constructor with every classification field left empty.
  pub fn new(claim_text: impl Into<String>) -> Self {
    Self {
      claim_text: claim_text.into(),
      ..Self::default()
    }
  }

  /// The one hard invariant on input: the original claim text is required.
  pub fn validate(&self) -> Result<()> {
    if self.claim_text.trim().is_empty() {
      return Err(Error::EmptyClaimText);
    }
    Ok(())
  }
}

// ─── ClaimExport ─────────────────────────────────────────────────────────────

/// A flat rendering of a [`Claim`] with `recorded_at` as RFC 3339 text
/// instead of a backend temporal type, so exported data can be moved
/// between backend kinds without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimExport {
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

impl ClaimExport {
  /// Rebuild the insertable portion for re-import into a fresh store.
  /// The assigned `id` and `recorded_at` are discarded.
  pub fn into_new_claim(self) -> NewClaim {
    NewClaim {
      claim_text:      self.claim_text,
      loss_type:       self.loss_type,
      severity:        self.severity,
      affected_assets: self.affected_assets,
      estimated_loss:  self.estimated_loss,
      incident_date:   self.incident_date,
      location:        self.location,
      confidence:      self.confidence,
      explanation:     self.explanation,
    }
  }
}
