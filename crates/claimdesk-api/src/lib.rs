//! JSON REST surface for Claimdesk.
//!
//! Exposes an axum [`Router`] backed by any [`ClaimStore`]. Auth, TLS, and
//! transport concerns are the caller's responsibility; the extraction step
//! POSTs normalized claims in, presentation layers consume the GET
//! endpoints read-only.

pub mod claims;
pub mod error;
pub mod recommendations;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use claimdesk_core::{
  config::BackendConfig, engine::RecommendationEngine, store::ClaimStore,
};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `claimdesk.toml` plus
/// `CLAIMDESK_*` environment overrides. Resolved exactly once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  /// Backend selection; defaults to the embedded store.
  #[serde(flatten)]
  pub backend: BackendConfig,
  /// Threshold for the engine's high-value payout rule.
  #[serde(default = "default_high_value_threshold")]
  pub high_value_threshold: f64,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

fn default_high_value_threshold() -> f64 {
  claimdesk_core::engine::DEFAULT_HIGH_VALUE_THRESHOLD
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S: ClaimStore> {
  pub store:  Arc<S>,
  pub engine: Arc<RecommendationEngine>,
}

// Manual impl so `S` itself need not be `Clone`.
impl<S: ClaimStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      engine: Arc::clone(&self.engine),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ClaimStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/claims",
      get(claims::list::<S>)
        .post(claims::create::<S>)
        .delete(claims::clear::<S>),
    )
    .route("/claims/search", get(claims::search::<S>))
    .route("/claims/stats", get(claims::stats::<S>))
    .route("/claims/export", get(claims::export::<S>))
    .route(
      "/claims/{id}",
      get(claims::get_one::<S>).delete(claims::delete_one::<S>),
    )
    .route(
      "/claims/{id}/recommendations",
      get(recommendations::list_for_claim::<S>),
    )
    .route(
      "/claims/{id}/recommendations/regenerate",
      post(recommendations::regenerate::<S>),
    )
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use claimdesk_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:  Arc::new(store),
      engine: Arc::new(RecommendationEngine::new(50_000.0)),
    }
  }

  async fn oneshot(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        builder.body(Body::from(v.to_string())).unwrap()
      }
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router(state).oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn critical_claim_body() -> Value {
    json!({
      "claim_text": "Warehouse gutted by fire overnight; stock destroyed",
      "loss_type": "Fire",
      "severity": "Critical",
      "affected_assets": "Warehouse, stock",
      "estimated_loss": "$75,000",
      "incident_date": "2025-11-05",
      "location": "Pune",
      "confidence": "High",
      "explanation": "Keywords 'gutted by fire' indicate a critical fire loss"
    })
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_derived_recommendations() {
    let state = make_state().await;
    let (status, body) =
      oneshot(state, "POST", "/claims", Some(critical_claim_body())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["claim"]["severity"], "Critical");

    // Critical severity and the over-threshold amount both fire.
    let actions: Vec<&str> = body["recommendations"]
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["action"].as_str().unwrap())
      .collect();
    assert!(actions.contains(&"Assign a senior adjuster immediately"));
    assert!(
      actions.contains(&"Obtain supervisor approval for high-value payout")
    );
  }

  #[tokio::test]
  async fn create_with_empty_text_returns_400() {
    let state = make_state().await;
    let (status, body) = oneshot(
      state,
      "POST",
      "/claims",
      Some(json!({ "claim_text": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("claim_text"));
  }

  // ── Reads ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_missing_claim_returns_404() {
    let state = make_state().await;
    let (status, _) = oneshot(state, "GET", "/claims/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn created_claim_is_readable_and_listed() {
    let state = make_state().await;
    let (_, created) = oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;
    let id = created["claim"]["id"].as_i64().unwrap();

    let (status, fetched) =
      oneshot(state.clone(), "GET", &format!("/claims/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["claim"]["id"]);

    let (_, listed) = oneshot(state, "GET", "/claims", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn search_returns_matching_subset() {
    let state = make_state().await;
    oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;
    oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(json!({
        "claim_text": "Minor scrape in the car park",
        "loss_type": "Accident",
        "severity": "Low",
        "affected_assets": "Vehicle",
        "estimated_loss": "₹3,000",
        "incident_date": "2025-11-06",
        "location": "Delhi",
        "confidence": "High",
        "explanation": "Minor accident"
      })),
    )
    .await;

    let (status, hits) =
      oneshot(state, "GET", "/claims/search?q=fire", None).await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["loss_type"], "Fire");
  }

  #[tokio::test]
  async fn stats_on_empty_store_is_all_zero() {
    let state = make_state().await;
    let (status, stats) = oneshot(state, "GET", "/claims/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 0);
    assert!(stats["by_severity"].as_object().unwrap().is_empty());
  }

  #[tokio::test]
  async fn export_renders_rfc3339_timestamps() {
    let state = make_state().await;
    oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;

    let (status, exported) =
      oneshot(state, "GET", "/claims/export", None).await;
    assert_eq!(status, StatusCode::OK);

    let recorded_at = exported[0]["recorded_at"].as_str().unwrap();
    assert!(
      chrono::DateTime::parse_from_rfc3339(recorded_at).is_ok(),
      "not RFC 3339: {recorded_at:?}"
    );
  }

  // ── Deletes ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_claim_cascades_to_recommendations() {
    let state = make_state().await;
    let (_, created) = oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;
    let id = created["claim"]["id"].as_i64().unwrap();
    assert!(!created["recommendations"].as_array().unwrap().is_empty());

    let (status, _) =
      oneshot(state.clone(), "DELETE", &format!("/claims/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      oneshot(state.clone(), "GET", &format!("/claims/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, recs) = oneshot(
      state,
      "GET",
      &format!("/claims/{id}/recommendations"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(recs.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_missing_claim_returns_404() {
    let state = make_state().await;
    let (status, _) = oneshot(state, "DELETE", "/claims/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn clear_reports_deleted_count() {
    let state = make_state().await;
    oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;
    oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;

    let (status, body) = oneshot(state.clone(), "DELETE", "/claims", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);

    let (_, listed) = oneshot(state, "GET", "/claims", None).await;
    assert!(listed.as_array().unwrap().is_empty());
  }

  // ── Recommendations ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn recommendations_are_ordered_by_priority() {
    let state = make_state().await;
    let (_, created) = oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;
    let id = created["claim"]["id"].as_i64().unwrap();

    let (_, recs) = oneshot(
      state,
      "GET",
      &format!("/claims/{id}/recommendations"),
      None,
    )
    .await;
    let priorities: Vec<&str> = recs
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["priority"].as_str().unwrap())
      .collect();
    assert_eq!(priorities.first(), Some(&"Critical"));
  }

  #[tokio::test]
  async fn regenerate_replaces_the_whole_batch() {
    let state = make_state().await;
    let (_, created) = oneshot(
      state.clone(),
      "POST",
      "/claims",
      Some(critical_claim_body()),
    )
    .await;
    let id = created["claim"]["id"].as_i64().unwrap();
    let first_ids: Vec<i64> = created["recommendations"]
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["id"].as_i64().unwrap())
      .collect();

    let (status, regenerated) = oneshot(
      state,
      "POST",
      &format!("/claims/{id}/recommendations/regenerate"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same deterministic content, fresh rows.
    let regenerated = regenerated.as_array().unwrap();
    assert_eq!(regenerated.len(), first_ids.len());
    assert!(
      regenerated
        .iter()
        .all(|r| !first_ids.contains(&r["id"].as_i64().unwrap()))
    );
  }

  #[tokio::test]
  async fn regenerate_for_missing_claim_returns_404() {
    let state = make_state().await;
    let (status, _) = oneshot(
      state,
      "POST",
      "/claims/999/recommendations/regenerate",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
