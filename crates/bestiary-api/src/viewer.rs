//! Extractor for the authenticated viewer.
//!
//! This crate does not authenticate anything itself. The embedding server
//! resolves the caller and inserts a [`Viewer`] into the request extensions;
//! handlers that need one reject with 401 when it is absent.

use axum::{extract::FromRequestParts, http::request::Parts};
use bestiary_core::profile::Viewer;

use crate::error::ApiError;

/// The caller, as placed in request extensions by the embedding server.
pub struct ApiViewer(pub Viewer);

impl<St: Send + Sync> FromRequestParts<St> for ApiViewer {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Viewer>()
      .copied()
      .map(ApiViewer)
      .ok_or(ApiError::Unauthorized)
  }
}
