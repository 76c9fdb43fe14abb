//! Species list and the delete confirmation flow.

use axum::{
  extract::{Path, Query, State},
  response::{IntoResponse, Redirect, Response},
};
use bestiary_core::{
  deletion::{self, StepOutcome},
  store::BestiaryStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::PageViewer,
  error::Error,
  notice::{Notice, NoticeCode},
  views,
};

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub notice:  Option<NoticeCode>,
  /// Scientific name the notice refers to.
  pub subject: Option<String>,
}

async fn render_list<S>(store: &S, notice: Option<&Notice>) -> Result<Response, Error>
where
  S: BestiaryStore,
{
  let species = store.list_species().await.map_err(Error::store)?;
  Ok(views::species_list(&species, notice).into_response())
}

/// `GET /species`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _viewer: PageViewer,
  Query(params): Query<ListParams>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let notice = params.notice.map(|c| c.into_notice(params.subject.as_deref()));
  render_list(state.store.as_ref(), notice.as_ref()).await
}

/// `GET /species/:id/delete` — the confirmation step.
pub async fn confirm_delete<S>(
  State(state): State<AppState<S>>,
  _viewer: PageViewer,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let species = state
    .store
    .get_species(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(views::confirm_delete(&species).into_response())
}

/// `POST /species/:id/delete`
///
/// Runs both deletion steps. When both succeed the browser is sent back to
/// the refreshed list; otherwise the list is rendered with a notice naming
/// the first step that failed.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  PageViewer(viewer): PageViewer,
  Path(id): Path<i64>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Name for the success notice.
  let name = match state.store.get_species(id).await {
    Ok(found) => found.map(|s| s.scientific_name),
    Err(e) => {
      tracing::warn!(species_id = id, error = %e, "error fetching species before delete");
      None
    }
  };

  let report = deletion::delete_species(state.store.as_ref(), id).await;
  tracing::info!(species_id = id, viewer = %viewer.profile_id, complete = report.is_complete(), "species delete");

  let notice = match (&report.species, &report.comments) {
    (StepOutcome::Failed { message }, _) => {
      Notice::destructive("Something went wrong.", message.as_str())
    }
    (_, StepOutcome::Failed { message }) => {
      Notice::destructive("Comments for the species were not deleted.", message.as_str())
    }
    _ => {
      let mut to = format!("/species?notice={}", NoticeCode::SpeciesDeleted.as_query());
      if let Some(name) = &name {
        to.push_str("&subject=");
        to.push_str(&urlencoding::encode(name));
      }
      return Ok(Redirect::to(&to).into_response());
    }
  };

  render_list(state.store.as_ref(), Some(&notice)).await
}
