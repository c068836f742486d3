//! Backend selection configuration.
//!
//! Resolved exactly once at startup into an immutable value object that is
//! passed explicitly to whichever store gets constructed; no code reads
//! backend configuration from global state after that.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which storage backend a process runs against. Exactly one per process
/// lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
  /// Single-file SQLite store; no network required.
  #[default]
  Embedded,
  /// Client/server PostgreSQL store reached through a connection URI.
  Networked,
}

/// The resolved backend choice.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
  #[serde(default, rename = "backend")]
  pub kind:         BackendKind,
  /// Path of the SQLite database file. Embedded only.
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// PostgreSQL connection URI. Required when `kind` is `Networked`.
  #[serde(default)]
  pub database_url: Option<String>,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("claimdesk.db")
}

impl Default for BackendConfig {
  fn default() -> Self {
    Self {
      kind:         BackendKind::default(),
      store_path:   default_store_path(),
      database_url: None,
    }
  }
}

impl BackendConfig {
  /// Fail fast on impossible combinations, before any connection attempt.
  pub fn validate(&self) -> Result<()> {
    if self.kind == BackendKind::Networked
      && self.database_url.as_deref().is_none_or(str::is_empty)
    {
      return Err(Error::Configuration(
        "database_url must be set when the networked backend is selected"
          .to_string(),
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_needs_no_url() {
    assert!(BackendConfig::default().validate().is_ok());
  }

  #[test]
  fn networked_without_url_is_a_configuration_error() {
    let cfg = BackendConfig {
      kind: BackendKind::Networked,
      ..BackendConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));
  }

  #[test]
  fn networked_with_empty_url_is_a_configuration_error() {
    let cfg = BackendConfig {
      kind: BackendKind::Networked,
      database_url: Some(String::new()),
      ..BackendConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));
  }

  #[test]
  fn networked_with_url_validates() {
    let cfg = BackendConfig {
      kind: BackendKind::Networked,
      database_url: Some("postgresql://localhost/claimdesk".to_string()),
      ..BackendConfig::default()
    };
    assert!(cfg.validate().is_ok());
  }
}
