//! Server-rendered pages for Bestiary.
//!
//! Exposes an axum [`Router`] with the sign-in flow, species list and
//! detail pages, comment forms and the users list, and nests the JSON API
//! from [`bestiary_api`] under `/api`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod html;
pub mod notice;
pub mod views;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  middleware,
  routing::{get, post},
};
use bestiary_core::store::BestiaryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{detail, session, species, users};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_session_ttl_hours() -> i64 { 24 * 7 }

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("session_ttl_hours must be between 1 and {max}, got {0}", max = MAX_SESSION_TTL_HOURS)]
  SessionTtl(i64),
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `BESTIARY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  #[serde(default = "default_session_ttl_hours")]
  pub session_ttl_hours: i64,
  /// Adds `Secure` to the session cookie. Enable behind TLS.
  #[serde(default)]
  pub secure_cookies:    bool,
}

impl ServerConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
      return Err(ConfigError::SessionTtl(self.session_ttl_hours));
    }
    Ok(())
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page handlers.
pub struct AppState<S: BestiaryStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S: BestiaryStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), config: self.config.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let api = bestiary_api::api_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.clone(), auth::attach_viewer::<S>),
  );

  Router::new()
    .route("/",                                       get(session::start::<S>))
    .route("/login",                                  post(session::login::<S>))
    .route("/logout",                                 post(session::logout::<S>))
    .route("/species",                                get(species::list::<S>))
    .route("/species/{id}",                           get(detail::show::<S>))
    .route(
      "/species/{id}/delete",
      get(species::confirm_delete::<S>).post(species::delete::<S>),
    )
    .route("/species/{id}/comments",                  post(detail::post_comment::<S>))
    .route("/species/{id}/comments/{comment_id}/delete", post(detail::delete_comment::<S>))
    .route("/users",                                  get(users::list::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}
