//! SQL schema for the networked PostgreSQL store.
//!
//! Executed once at pool construction. Idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`, so repeated startups never lose data.

/// Full schema DDL.
///
/// The logical column set (names, types, nullability) is kept identical to
/// the SQLite schema so repository code never branches on backend kind; the
/// primary keys are sequence-backed here instead of auto-incrementing.
/// `recorded_at` defaults to UTC wall-clock to match the embedded backend's
/// `CURRENT_TIMESTAMP` semantics. Cascade from recommendations to claims is
/// declared here, not emulated in application code.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS claims (
    id              BIGSERIAL PRIMARY KEY,
    recorded_at     TIMESTAMP NOT NULL DEFAULT (now() AT TIME ZONE 'utc'),
    claim_text      TEXT NOT NULL,
    loss_type       TEXT NOT NULL DEFAULT '',
    severity        TEXT NOT NULL DEFAULT '',
    affected_assets TEXT NOT NULL DEFAULT '',
    estimated_loss  TEXT NOT NULL DEFAULT '',
    incident_date   TEXT NOT NULL DEFAULT '',
    location        TEXT NOT NULL DEFAULT '',
    confidence      TEXT NOT NULL DEFAULT '',
    explanation     TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS claim_recommendations (
    id        BIGSERIAL PRIMARY KEY,
    claim_id  BIGINT NOT NULL REFERENCES claims(id) ON DELETE CASCADE,
    action    TEXT NOT NULL,
    priority  TEXT NOT NULL,
    category  TEXT NOT NULL,
    icon      TEXT,
    reasoning TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS claims_recorded_idx ON claims(recorded_at);
CREATE INDEX IF NOT EXISTS recommendations_claim_idx
    ON claim_recommendations(claim_id);
";
