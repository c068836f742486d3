//! [`SqliteStore`] — the embedded SQLite implementation of [`ClaimStore`].

use std::{collections::BTreeMap, path::Path};

use rusqlite::OptionalExtension as _;

use claimdesk_core::{
  claim::{Claim, ClaimExport, NewClaim},
  recommendation::{NewRecommendation, Recommendation},
  store::{ClaimStats, ClaimStore},
};

use crate::{
  Error, Result,
  encode::{RawClaim, RawRecommendation},
  schema::SCHEMA,
  sql::like_pattern,
};

/// Columns selected for every claim read, so each query sees one shape.
const CLAIM_COLUMNS: &str = "id, recorded_at, claim_text, loss_type, \
   severity, affected_assets, estimated_loss, incident_date, location, \
   confidence, explanation";

const RECOMMENDATION_COLUMNS: &str =
  "id, claim_id, action, priority, category, icon, reasoning";

/// Ranks priorities Critical → Low for read ordering; insertion order (id)
/// breaks ties.
const PRIORITY_RANK: &str = "CASE priority
     WHEN 'Critical' THEN 1
     WHEN 'High'     THEN 2
     WHEN 'Medium'   THEN 3
     WHEN 'Low'      THEN 4
     ELSE 5
   END";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Claimdesk store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ClaimStore impl ─────────────────────────────────────────────────────────

impl ClaimStore for SqliteStore {
  type Error = Error;

  // ── Claims ────────────────────────────────────────────────────────────────

  async fn create_claim(&self, input: NewClaim) -> Result<Claim> {
    input.validate()?;

    let raw: RawClaim = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO claims (
             claim_text, loss_type, severity, affected_assets,
             estimated_loss, incident_date, location, confidence, explanation
           ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
          rusqlite::params![
            input.claim_text,
            input.loss_type,
            input.severity,
            input.affected_assets,
            input.estimated_loss,
            input.incident_date,
            input.location,
            input.confidence,
            input.explanation,
          ],
        )?;

        // The assigned id and timestamp are only available out-of-band on
        // this backend; read the row back in the same connection call.
        let id = conn.last_insert_rowid();
        let raw = conn.query_row(
          &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = ?"),
          rusqlite::params![id],
          RawClaim::from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_claim()
  }

  async fn get_claim(&self, id: i64) -> Result<Option<Claim>> {
    let raw: Option<RawClaim> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = ?"),
              rusqlite::params![id],
              RawClaim::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawClaim::into_claim).transpose()
  }

  async fn list_claims(&self) -> Result<Vec<Claim>> {
    let raws: Vec<RawClaim> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CLAIM_COLUMNS} FROM claims
           ORDER BY recorded_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawClaim::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClaim::into_claim).collect()
  }

  async fn search_claims(&self, needle: &str) -> Result<Vec<Claim>> {
    // Case-insensitivity is forced with LOWER on both backends rather than
    // relying on SQLite's ASCII-only LIKE default matching PostgreSQL.
    let pattern = like_pattern(needle);

    let raws: Vec<RawClaim> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CLAIM_COLUMNS} FROM claims
           WHERE LOWER(claim_text) LIKE ? ESCAPE '\\'
              OR LOWER(loss_type)  LIKE ? ESCAPE '\\'
              OR LOWER(location)   LIKE ? ESCAPE '\\'
           ORDER BY recorded_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![pattern, pattern, pattern],
            RawClaim::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClaim::into_claim).collect()
  }

  async fn delete_claim(&self, id: i64) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM claims WHERE id = ?", rusqlite::params![id])?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn clear_claims(&self) -> Result<u64> {
    let affected = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM claims", [])?))
      .await?;

    Ok(affected as u64)
  }

  async fn stats(&self) -> Result<ClaimStats> {
    fn group_counts(
      conn: &rusqlite::Connection,
      column: &str,
    ) -> rusqlite::Result<BTreeMap<String, u64>> {
      let mut stmt = conn.prepare(&format!(
        "SELECT {column} AS label, COUNT(*) AS n
         FROM claims GROUP BY {column}"
      ))?;
      let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>("label")?, row.get::<_, u64>("n")?))
      })?;
      rows.collect()
    }

    let stats = self
      .conn
      .call(|conn| {
        let total: u64 = conn.query_row(
          "SELECT COUNT(*) AS n FROM claims",
          [],
          |row| row.get("n"),
        )?;

        Ok(ClaimStats {
          total,
          by_severity:   group_counts(conn, "severity")?,
          by_loss_type:  group_counts(conn, "loss_type")?,
          by_confidence: group_counts(conn, "confidence")?,
        })
      })
      .await?;

    Ok(stats)
  }

  async fn export_claims(&self) -> Result<Vec<ClaimExport>> {
    let claims = self.list_claims().await?;
    Ok(claims.into_iter().map(Claim::into_export).collect())
  }

  // ── Recommendations ───────────────────────────────────────────────────────

  async fn save_recommendations(
    &self,
    claim_id: i64,
    batch: Vec<NewRecommendation>,
  ) -> Result<Vec<Recommendation>> {
    if batch.is_empty() {
      return Ok(Vec::new());
    }

    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(batch.len());
        {
          let mut stmt = tx.prepare(
            "INSERT INTO claim_recommendations (
               claim_id, action, priority, category, icon, reasoning
             ) VALUES (?, ?, ?, ?, ?, ?)",
          )?;
          for rec in &batch {
            stmt.execute(rusqlite::params![
              claim_id,
              rec.action,
              rec.priority.as_str(),
              rec.category.as_str(),
              rec.icon,
              rec.reasoning,
            ])?;
            ids.push(tx.last_insert_rowid());
          }
        }
        tx.commit()?;

        let saved = batch
          .into_iter()
          .zip(ids)
          .map(|(rec, id)| Recommendation {
            id,
            claim_id,
            action: rec.action,
            priority: rec.priority,
            category: rec.category,
            icon: rec.icon,
            reasoning: rec.reasoning,
          })
          .collect();
        Ok(saved)
      })
      .await;

    match result {
      Ok(saved) => Ok(saved),
      Err(e) if is_constraint_violation(&e) => Err(Error::MissingClaim(claim_id)),
      Err(e) => Err(Error::Database(e)),
    }
  }

  async fn recommendations_for(
    &self,
    claim_id: i64,
  ) -> Result<Vec<Recommendation>> {
    let raws: Vec<RawRecommendation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECOMMENDATION_COLUMNS} FROM claim_recommendations
           WHERE claim_id = ?
           ORDER BY {PRIORITY_RANK}, id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![claim_id], RawRecommendation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRecommendation::into_recommendation)
      .collect()
  }

  async fn has_recommendations(&self, claim_id: i64) -> Result<bool> {
    let present: bool = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS(
             SELECT 1 FROM claim_recommendations WHERE claim_id = ?
           ) AS present",
          rusqlite::params![claim_id],
          |row| row.get("present"),
        )?)
      })
      .await?;

    Ok(present)
  }

  async fn delete_recommendations(&self, claim_id: i64) -> Result<u64> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM claim_recommendations WHERE claim_id = ?",
          rusqlite::params![claim_id],
        )?)
      })
      .await?;

    Ok(affected as u64)
  }
}

// ─── Error translation ───────────────────────────────────────────────────────

/// True when the backend rejected a statement with a constraint violation
/// (here: the recommendation → claim foreign key).
fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}
