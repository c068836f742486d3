//! Error type for `claimdesk-store-postgres`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] claimdesk_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_postgres::Error),

  /// The backend is unreachable: bad connection string, pool construction
  /// failure, or a failed checkout. Surfaced to the caller, never retried
  /// here — retry policy belongs to the surrounding application.
  #[error("connection error: {0}")]
  Connection(String),

  /// A recommendation batch referenced a claim id with no matching row.
  #[error("claim {0} does not exist")]
  MissingClaim(i64),

  /// A stored value could not be decoded into its domain type.
  #[error("malformed row: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
