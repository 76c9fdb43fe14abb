//! Handlers for `/species` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/species` | All species, ordered by id |
//! | `GET`    | `/species/:id` | 404 if not found |
//! | `DELETE` | `/species/:id` | Deletes the species, then its comments; returns the per-step report |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bestiary_core::{deletion, species::Species, store::BestiaryStore};

use crate::{error::ApiError, viewer::ApiViewer};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /species`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _viewer: ApiViewer,
) -> Result<Json<Vec<Species>>, ApiError>
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let species = store
    .list_species()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(species))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /species/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  _viewer: ApiViewer,
  Path(id): Path<i64>,
) -> Result<Json<Species>, ApiError>
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let species = store
    .get_species(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("species {id} not found")))?;
  Ok(Json(species))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /species/:id` — 200 with the report when both steps succeeded,
/// 500 with the same report otherwise.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  ApiViewer(viewer): ApiViewer,
  Path(id): Path<i64>,
) -> impl IntoResponse
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = deletion::delete_species(store.as_ref(), id).await;
  tracing::info!(species_id = id, viewer = %viewer.profile_id, complete = report.is_complete(), "species deleted");

  let status = if report.is_complete() {
    StatusCode::OK
  } else {
    StatusCode::INTERNAL_SERVER_ERROR
  };
  (status, Json(report))
}
