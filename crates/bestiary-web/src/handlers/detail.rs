//! Species detail page with its comment thread.
//!
//! Every request opens a fresh [`CommentThread`]; the sort order travels in
//! the `order` query parameter or form field.

use axum::{
  Form,
  extract::{Path, Query, State},
  response::{IntoResponse, Redirect, Response},
};
use bestiary_core::{
  comment::SortOrder,
  species::Species,
  store::BestiaryStore,
  thread::CommentThread,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::PageViewer,
  error::Error,
  notice::{Notice, NoticeCode},
  views,
};

async fn load_species<S>(store: &S, id: i64) -> Result<Species, Error>
where
  S: BestiaryStore,
{
  store
    .get_species(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)
}

fn detail_url(id: i64, order: SortOrder, notice: NoticeCode) -> String {
  format!("/species/{id}?order={}&notice={}", order.as_query(), notice.as_query())
}

/// Re-open `thread` and render the page with a failure notice. A failing
/// re-open is shown in the thread's own error state.
async fn render_with_failure<S>(
  store: &S,
  species: &Species,
  mut thread: CommentThread,
  notice: Notice,
) -> Response
where
  S: BestiaryStore,
{
  let _ = thread.open(store).await;
  views::species_detail(species, &thread, Some(&notice)).into_response()
}

// ─── View ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct DetailParams {
  pub order:  Option<SortOrder>,
  pub notice: Option<NoticeCode>,
}

/// `GET /species/:id[?order=asc|desc][&notice=...]`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  PageViewer(viewer): PageViewer,
  Path(id): Path<i64>,
  Query(params): Query<DetailParams>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let species = load_species(store, id).await?;

  let mut thread =
    CommentThread::new(id, viewer.profile_id).with_order(params.order.unwrap_or_default());
  if let Err(e) = thread.open(store).await {
    tracing::warn!(species_id = id, error = %e, "error fetching comments");
  }

  let notice = params
    .notice
    .map(|c| c.into_notice(Some(&species.scientific_name)));
  Ok(views::species_detail(&species, &thread, notice.as_ref()).into_response())
}

// ─── Post ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PostForm {
  #[serde(default)]
  pub comment: String,
  pub order:   Option<SortOrder>,
}

/// `POST /species/:id/comments`
///
/// On success redirects back to the detail page with an empty input; on
/// failure re-renders it with the typed text still in place.
pub async fn post_comment<S>(
  State(state): State<AppState<S>>,
  PageViewer(viewer): PageViewer,
  Path(id): Path<i64>,
  Form(form): Form<PostForm>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let species = load_species(store, id).await?;
  let order = form.order.unwrap_or_default();

  let mut thread = CommentThread::new(id, viewer.profile_id).with_order(order);
  thread.set_draft(form.comment);

  match thread.post(store).await {
    Ok(_) => Ok(Redirect::to(&detail_url(id, order, NoticeCode::CommentAdded)).into_response()),
    Err(bestiary_core::Error::EmptyComment) => {
      let notice = Notice::destructive("Comment not posted.", "Comment cannot be empty.");
      Ok(render_with_failure(store, &species, thread, notice).await)
    }
    Err(e) => {
      tracing::warn!(species_id = id, error = %e, "error posting comment");
      Ok(render_with_failure(store, &species, thread, Notice::failure(&e)).await)
    }
  }
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct DeleteForm {
  pub order: Option<SortOrder>,
}

/// `POST /species/:id/comments/:comment_id/delete`
pub async fn delete_comment<S>(
  State(state): State<AppState<S>>,
  PageViewer(viewer): PageViewer,
  Path((id, comment_id)): Path<(i64, i64)>,
  Form(form): Form<DeleteForm>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let store = state.store.as_ref();
  let species = load_species(store, id).await?;
  let order = form.order.unwrap_or_default();

  let mut thread = CommentThread::new(id, viewer.profile_id).with_order(order);
  match thread.delete(store, comment_id).await {
    Ok(0) => Ok(Redirect::to(&detail_url(id, order, NoticeCode::CommentNotDeleted)).into_response()),
    Ok(_) => Ok(Redirect::to(&detail_url(id, order, NoticeCode::CommentDeleted)).into_response()),
    Err(e) => {
      tracing::warn!(species_id = id, comment_id, error = %e, "error deleting comment");
      Ok(render_with_failure(store, &species, thread, Notice::failure(&e)).await)
    }
  }
}
