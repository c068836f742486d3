//! The `ClaimStore` trait and supporting aggregate types.
//!
//! The trait is implemented by storage backends (`claimdesk-store-sqlite`,
//! `claimdesk-store-postgres`). Higher layers depend on this abstraction,
//! not on any concrete backend; nothing outside the backend crates ever
//! branches on backend kind.

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};

use crate::{
  claim::{Claim, ClaimExport, NewClaim},
  recommendation::{NewRecommendation, Recommendation},
};

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Grouped counts over the stored claims.
///
/// An empty store yields a zero total and empty maps, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimStats {
  pub total:         u64,
  pub by_severity:   BTreeMap<String, u64>,
  pub by_loss_type:  BTreeMap<String, u64>,
  pub by_confidence: BTreeMap<String, u64>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Claimdesk storage backend.
///
/// Every read reflects the latest committed state of the backend at call
/// time; implementations do no caching and no in-process locking. All
/// methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ClaimStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Claims ────────────────────────────────────────────────────────────

  /// Insert a claim and return it with the store-assigned `id` and
  /// `recorded_at`. How the backend hands back the assigned id (last-insert
  /// lookup vs. returning clause) is hidden behind this contract.
  fn create_claim(
    &self,
    input: NewClaim,
  ) -> impl Future<Output = Result<Claim, Self::Error>> + Send + '_;

  /// Retrieve a claim by id. Returns `None` if not found.
  fn get_claim(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Claim>, Self::Error>> + Send + '_;

  /// List all claims, newest first (ties broken by descending id).
  fn list_claims(
    &self,
  ) -> impl Future<Output = Result<Vec<Claim>, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over `claim_text`, `loss_type`, and
  /// `location`. Both backends force case-insensitivity, so the same stored
  /// data produces the same result set regardless of backend kind. An empty
  /// result set is not an error.
  fn search_claims<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<Claim>, Self::Error>> + Send + 'a;

  /// Delete a claim by id, cascading to its recommendations at the schema
  /// level. Returns `false` if no such claim existed.
  fn delete_claim(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every claim and, transitively, every recommendation. Returns
  /// the number of claims removed.
  fn clear_claims(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Grouped counts; see [`ClaimStats`].
  fn stats(
    &self,
  ) -> impl Future<Output = Result<ClaimStats, Self::Error>> + Send + '_;

  /// All claims in the flat, backend-independent export shape with RFC 3339
  /// timestamps.
  fn export_claims(
    &self,
  ) -> impl Future<Output = Result<Vec<ClaimExport>, Self::Error>> + Send + '_;

  // ── Recommendations ───────────────────────────────────────────────────

  /// Persist a batch of recommendations for `claim_id` in a single
  /// transaction: either the whole batch becomes visible or none of it.
  /// Referencing a nonexistent claim is an integrity error.
  fn save_recommendations(
    &self,
    claim_id: i64,
    batch: Vec<NewRecommendation>,
  ) -> impl Future<Output = Result<Vec<Recommendation>, Self::Error>> + Send + '_;

  /// All recommendations for a claim, ordered by priority rank then
  /// insertion order. Empty for an unknown claim id.
  fn recommendations_for(
    &self,
    claim_id: i64,
  ) -> impl Future<Output = Result<Vec<Recommendation>, Self::Error>> + Send + '_;

  fn has_recommendations(
    &self,
    claim_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete all recommendations for a claim; returns the number removed.
  fn delete_recommendations(
    &self,
    claim_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
