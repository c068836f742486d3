//! Error type for `claimdesk-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] claimdesk_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A recommendation batch referenced a claim id with no matching row.
  #[error("claim {0} does not exist")]
  MissingClaim(i64),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value could not be decoded into its domain type.
  #[error("malformed row: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
