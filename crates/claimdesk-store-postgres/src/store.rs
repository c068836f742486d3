//! [`PostgresStore`] — the networked PostgreSQL implementation of
//! [`ClaimStore`].

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row, error::SqlState};

use claimdesk_core::{
  claim::{Claim, ClaimExport, NewClaim},
  recommendation::{Category, NewRecommendation, Priority, Recommendation},
  store::{ClaimStats, ClaimStore},
};

use crate::{
  Error, Result,
  schema::SCHEMA,
  sql::{adapt_placeholders, like_pattern},
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

/// Maximum pooled connections.
const POOL_MAX_SIZE: usize = 16;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Claimdesk store backed by a PostgreSQL server.
///
/// Cloning is cheap — the pool is reference-counted.
#[derive(Clone)]
pub struct PostgresStore {
  pool: Pool,
}

impl PostgresStore {
  /// Parse `url`, build a connection pool, and run schema initialisation.
  pub async fn connect(url: &str) -> Result<Self> {
    let pg_config: tokio_postgres::Config = url.parse().map_err(
      |e: tokio_postgres::Error| {
        Error::Connection(format!("invalid connection string: {e}"))
      },
    )?;

    let manager = Manager::from_config(
      pg_config,
      NoTls,
      ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
      },
    );
    let pool = Pool::builder(manager)
      .max_size(POOL_MAX_SIZE)
      .runtime(Runtime::Tokio1)
      .build()
      .map_err(|e| Error::Connection(e.to_string()))?;

    let store = Self { pool };
    store.init_schema().await?;
    Ok(store)
  }

  /// Check a client out of the pool; it returns on drop on every exit path.
  async fn client(&self) -> Result<Object> {
    self
      .pool
      .get()
      .await
      .map_err(|e| Error::Connection(e.to_string()))
  }

  async fn init_schema(&self) -> Result<()> {
    let client = self.client().await?;
    client.batch_execute(SCHEMA).await?;
    Ok(())
  }
}

// ─── Row decoding ────────────────────────────────────────────────────────────

fn claim_from_row(row: &Row) -> Result<Claim> {
  Ok(Claim {
    id:              row.try_get("id")?,
    recorded_at:     row.try_get::<_, NaiveDateTime>("recorded_at")?.and_utc(),
    claim_text:      row.try_get("claim_text")?,
    loss_type:       row.try_get("loss_type")?,
    severity:        row.try_get("severity")?,
    affected_assets: row.try_get("affected_assets")?,
    estimated_loss:  row.try_get("estimated_loss")?,
    incident_date:   row.try_get("incident_date")?,
    location:        row.try_get("location")?,
    confidence:      row.try_get("confidence")?,
    explanation:     row.try_get("explanation")?,
  })
}

fn recommendation_from_row(row: &Row) -> Result<Recommendation> {
  let priority_str: String = row.try_get("priority")?;
  let category_str: String = row.try_get("category")?;

  let priority = Priority::parse(&priority_str)
    .ok_or_else(|| Error::Decode(format!("unknown priority: {priority_str:?}")))?;
  let category = Category::parse(&category_str)
    .ok_or_else(|| Error::Decode(format!("unknown category: {category_str:?}")))?;

  Ok(Recommendation {
    id: row.try_get("id")?,
    claim_id: row.try_get("claim_id")?,
    action: row.try_get("action")?,
    priority,
    category,
    icon: row.try_get("icon")?,
    reasoning: row.try_get("reasoning")?,
  })
}

// ─── ClaimStore impl ─────────────────────────────────────────────────────────

impl ClaimStore for PostgresStore {
  type Error = Error;

  // ── Claims ────────────────────────────────────────────────────────────────

  async fn create_claim(&self, input: NewClaim) -> Result<Claim> {
    input.validate()?;
    let client = self.client().await?;

    // This backend hands the assigned id and timestamp back in-statement.
    let sql = adapt_placeholders(&format!(
      "INSERT INTO claims (
         claim_text, loss_type, severity, affected_assets,
         estimated_loss, incident_date, location, confidence, explanation
       ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
       RETURNING {CLAIM_COLUMNS}"
    ));

    let row = client
      .query_one(&sql, &[
        &input.claim_text,
        &input.loss_type,
        &input.severity,
        &input.affected_assets,
        &input.estimated_loss,
        &input.incident_date,
        &input.location,
        &input.confidence,
        &input.explanation,
      ])
      .await?;

    claim_from_row(&row)
  }

  async fn get_claim(&self, id: i64) -> Result<Option<Claim>> {
    let client = self.client().await?;
    let sql = adapt_placeholders(&format!(
      "SELECT {CLAIM_COLUMNS} FROM claims WHERE id = ?"
    ));

    let row = client.query_opt(&sql, &[&id]).await?;
    row.as_ref().map(claim_from_row).transpose()
  }

  async fn list_claims(&self) -> Result<Vec<Claim>> {
    let client = self.client().await?;
    let sql = adapt_placeholders(&format!(
      "SELECT {CLAIM_COLUMNS} FROM claims
       ORDER BY recorded_at DESC, id DESC"
    ));

    let rows = client.query(&sql, &[]).await?;
    rows.iter().map(claim_from_row).collect()
  }

  async fn search_claims(&self, needle: &str) -> Result<Vec<Claim>> {
    // Case-insensitivity is forced with LOWER on both backends so result
    // sets match the embedded backend for the same stored data.
    let pattern = like_pattern(needle);
    let client = self.client().await?;
    let sql = adapt_placeholders(&format!(
      "SELECT {CLAIM_COLUMNS} FROM claims
       WHERE LOWER(claim_text) LIKE ? ESCAPE '\\'
          OR LOWER(loss_type)  LIKE ? ESCAPE '\\'
          OR LOWER(location)   LIKE ? ESCAPE '\\'
       ORDER BY recorded_at DESC, id DESC"
    ));

    let rows = client
      .query(&sql, &[&pattern, &pattern, &pattern])
      .await?;
    rows.iter().map(claim_from_row).collect()
  }

  async fn delete_claim(&self, id: i64) -> Result<bool> {
    let client = self.client().await?;
    let sql = adapt_placeholders("DELETE FROM claims WHERE id = ?");

    let affected = client.execute(&sql, &[&id]).await?;
    Ok(affected > 0)
  }

  async fn clear_claims(&self) -> Result<u64> {
    let client = self.client().await?;
    let sql = adapt_placeholders("DELETE FROM claims");

    Ok(client.execute(&sql, &[]).await?)
  }

  async fn stats(&self) -> Result<ClaimStats> {
    async fn group_counts(
      client: &Object,
      column: &str,
    ) -> Result<BTreeMap<String, u64>> {
      let sql = adapt_placeholders(&format!(
        "SELECT {column} AS label, COUNT(*) AS n
         FROM claims GROUP BY {column}"
      ));
      let rows = client.query(&sql, &[]).await?;

      let mut out = BTreeMap::new();
      for row in &rows {
        let label: String = row.try_get("label")?;
        let n: i64 = row.try_get("n")?;
        out.insert(label, u64::try_from(n).unwrap_or(0));
      }
      Ok(out)
    }

    let client = self.client().await?;
    let total: i64 = client
      .query_one(&adapt_placeholders("SELECT COUNT(*) AS n FROM claims"), &[])
      .await?
      .try_get("n")?;

    Ok(ClaimStats {
      total:         u64::try_from(total).unwrap_or(0),
      by_severity:   group_counts(&client, "severity").await?,
      by_loss_type:  group_counts(&client, "loss_type").await?,
      by_confidence: group_counts(&client, "confidence").await?,
    })
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

    let mut client = self.client().await?;
    let tx = client.transaction().await?;

    let sql = adapt_placeholders(&format!(
      "INSERT INTO claim_recommendations (
         claim_id, action, priority, category, icon, reasoning
       ) VALUES (?, ?, ?, ?, ?, ?)
       RETURNING {RECOMMENDATION_COLUMNS}"
    ));
    let stmt = tx.prepare(&sql).await?;

    let mut saved = Vec::with_capacity(batch.len());
    for rec in &batch {
      let priority = rec.priority.as_str();
      let category = rec.category.as_str();
      let row = tx
        .query_one(&stmt, &[
          &claim_id,
          &rec.action,
          &priority,
          &category,
          &rec.icon,
          &rec.reasoning,
        ])
        .await
        .map_err(|e| translate_fk(e, claim_id))?;
      saved.push(recommendation_from_row(&row)?);
    }

    tx.commit().await?;
    Ok(saved)
  }

  async fn recommendations_for(
    &self,
    claim_id: i64,
  ) -> Result<Vec<Recommendation>> {
    let client = self.client().await?;
    let sql = adapt_placeholders(&format!(
      "SELECT {RECOMMENDATION_COLUMNS} FROM claim_recommendations
       WHERE claim_id = ?
       ORDER BY {PRIORITY_RANK}, id"
    ));

    let rows = client.query(&sql, &[&claim_id]).await?;
    rows.iter().map(recommendation_from_row).collect()
  }

  async fn has_recommendations(&self, claim_id: i64) -> Result<bool> {
    let client = self.client().await?;
    let sql = adapt_placeholders(
      "SELECT EXISTS(
         SELECT 1 FROM claim_recommendations WHERE claim_id = ?
       ) AS present",
    );

    let row = client.query_one(&sql, &[&claim_id]).await?;
    Ok(row.try_get("present")?)
  }

  async fn delete_recommendations(&self, claim_id: i64) -> Result<u64> {
    let client = self.client().await?;
    let sql = adapt_placeholders(
      "DELETE FROM claim_recommendations WHERE claim_id = ?",
    );

    Ok(client.execute(&sql, &[&claim_id]).await?)
  }
}

// ─── Error translation ───────────────────────────────────────────────────────

/// Map a foreign-key violation onto the integrity error naming the claim;
/// everything else passes through untranslated.
fn translate_fk(err: tokio_postgres::Error, claim_id: i64) -> Error {
  if err.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
    Error::MissingClaim(claim_id)
  } else {
    Error::Database(err)
  }
}
