//! JSON REST API for Bestiary.
//!
//! Exposes an axum [`Router`] backed by any [`bestiary_core::store::BestiaryStore`].
//! Authentication is the caller's responsibility: the embedding server must
//! insert a [`bestiary_core::profile::Viewer`] into request extensions.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", bestiary_api::api_router(store.clone()))
//! ```

pub mod comments;
pub mod error;
pub mod profiles;
pub mod species;
pub mod viewer;

use std::sync::Arc;

use axum::{Router, routing::get};
use bestiary_core::store::BestiaryStore;

pub use error::ApiError;
pub use viewer::ApiViewer;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Species
    .route("/species", get(species::list::<S>))
    .route("/species/{id}", get(species::get_one::<S>).delete(species::delete_one::<S>))
    // Comments
    .route(
      "/species/{id}/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    .route(
      "/species/{id}/comments/{comment_id}",
      axum::routing::delete(comments::delete_one::<S>),
    )
    // Profiles
    .route("/profiles", get(profiles::list::<S>))
    .route("/me", get(profiles::me::<S>))
    .with_state(store)
}
