//! SQL schema for the embedded SQLite store.
//!
//! Executed once at connection startup. Idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`, so reopening an existing file never loses
//! data.

/// Full schema DDL.
///
/// The logical column set (names, types, nullability) is kept identical to
/// the PostgreSQL schema so repository code never branches on backend kind;
/// only the primary-key generation syntax differs. Cascade from
/// recommendations to claims is declared here, not emulated in application
/// code, and `foreign_keys` is switched on because SQLite leaves it off per
/// connection.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS claims (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    recorded_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
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
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id  INTEGER NOT NULL REFERENCES claims(id) ON DELETE CASCADE,
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
