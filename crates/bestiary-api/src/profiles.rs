//! Handlers for profile endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profiles` | All profiles, id descending |
//! | `GET`  | `/me` | The caller's own profile |

use std::sync::Arc;

use axum::{Json, extract::State};
use bestiary_core::{profile::Profile, store::BestiaryStore};

use crate::{error::ApiError, viewer::ApiViewer};

/// `GET /profiles`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _viewer: ApiViewer,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profiles = store
    .list_profiles()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(profiles))
}

/// `GET /me`
pub async fn me<S>(
  State(store): State<Arc<S>>,
  ApiViewer(viewer): ApiViewer,
) -> Result<Json<Profile>, ApiError>
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profile = store
    .get_profile(viewer.profile_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("profile {} not found", viewer.profile_id)))?;
  Ok(Json(profile))
}
