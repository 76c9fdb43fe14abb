//! `GET /users` — every profile, newest id first. Signed-in viewers only.

use axum::{
  extract::State,
  response::{IntoResponse, Response},
};
use bestiary_core::store::BestiaryStore;

use crate::{AppState, auth::PageViewer, error::Error, views};

pub async fn list<S>(
  State(state): State<AppState<S>>,
  _viewer: PageViewer,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let profiles = state.store.list_profiles().await.map_err(Error::store)?;
  Ok(views::users(&profiles).into_response())
}
