//! Handlers for `/claims/:id/recommendations` endpoints.

use axum::{
  Json,
  extract::{Path, State},
};
use claimdesk_core::{recommendation::Recommendation, store::ClaimStore};

use crate::{AppState, error::ApiError};

/// `GET /claims/:id/recommendations` — ordered by priority rank then
/// insertion order. Empty for an unknown claim id (an empty action list is
/// not an error).
pub async fn list_for_claim<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Recommendation>>, ApiError>
where
  S: ClaimStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let recs = state
    .store
    .recommendations_for(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(recs))
}

/// `POST /claims/:id/recommendations/regenerate` — replace the whole batch:
/// delete what is stored, re-run the engine on the stored claim, persist the
/// fresh output. 404 if the claim does not exist.
pub async fn regenerate<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Recommendation>>, ApiError>
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

  state
    .store
    .delete_recommendations(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let derived = state.engine.recommend(&claim);
  let recs = state
    .store
    .save_recommendations(id, derived)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(recs))
}
