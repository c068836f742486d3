//! Handlers for `/claims` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/claims` | Body: a `NewClaim`; runs the engine and persists its output |
//! | `GET`    | `/claims` | Newest first |
//! | `GET`    | `/claims/search?q=` | Case-insensitive substring search |
//! | `GET`    | `/claims/stats` | Grouped counts |
//! | `GET`    | `/claims/export` | Backend-independent flat records |
//! | `GET`    | `/claims/:id` | 404 if not found |
//! | `DELETE` | `/claims/:id` | Cascades to recommendations; 404 if not found |
//! | `DELETE` | `/claims` | Clears the whole store |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use claimdesk_core::{
  claim::{Claim, ClaimExport, NewClaim},
  recommendation::Recommendation,
  store::{ClaimStats, ClaimStore},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// Response body for `POST /claims`: the stored claim plus the
/// recommendation batch derived for it.
#[derive(Debug, Serialize)]
pub struct CreatedClaim {
  pub claim:           Claim,
  pub recommendations: Vec<Recommendation>,
}

/// `POST /claims` — persist the claim, run the engine, persist the batch.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewClaim>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.claim_text.trim().is_empty() {
    return Err(ApiError::BadRequest("claim_text must not be empty".to_string()));
  }

  let claim = state
    .store
    .create_claim(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let derived = state.engine.recommend(&claim);
  let recommendations = state
    .store
    .save_recommendations(claim.id, derived)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(CreatedClaim { claim, recommendations })))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /claims`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Claim>>, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let claims = state
    .store
    .list_claims()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(claims))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  #[serde(default)]
  pub q: String,
}

/// `GET /claims/search?q=<needle>`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Claim>>, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let claims = state
    .store
    .search_claims(&params.q)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(claims))
}

/// `GET /claims/stats`
pub async fn stats<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<ClaimStats>, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = state
    .store
    .stats()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}

/// `GET /claims/export`
pub async fn export<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ClaimExport>>, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state
    .store
    .export_claims()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(records))
}

/// `GET /claims/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Claim>, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let claim = state
    .store
    .get_claim(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("claim {id} not found")))?;
  Ok(Json(claim))
}

// ─── Deletes ──────────────────────────────────────────────────────────────────

/// `DELETE /claims/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_claim(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("claim {id} not found")))
  }
}

/// `DELETE /claims` — clear the whole store.
pub async fn clear<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = state
    .store
    .clear_claims()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(serde_json::json!({ "deleted": deleted })))
}
