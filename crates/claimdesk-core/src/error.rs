//! Error types for `claimdesk-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad or missing backend configuration. Fatal at startup; nothing opens
  /// a connection before this is resolved.
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("claim text must not be empty")]
  EmptyClaimText,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
