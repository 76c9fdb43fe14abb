//! Handlers for `/species/:id/comments` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/species/:id/comments` | Optional `?order=asc\|desc` (default `desc`); each row carries `can_delete` |
//! | `POST`   | `/species/:id/comments` | Body: `{"comment":"..."}`; returns 201 + stored comment |
//! | `DELETE` | `/species/:id/comments/:comment_id` | Only the author's own comment is removed; returns `{"deleted":n}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bestiary_core::{
  comment::{Comment, SortOrder},
  store::BestiaryStore,
  thread::CommentThread,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{error::ApiError, viewer::ApiViewer};

/// A comment as returned to a particular viewer.
#[derive(Debug, Serialize)]
pub struct CommentView {
  #[serde(flatten)]
  pub comment:    Comment,
  pub can_delete: bool,
}

async fn ensure_species<S>(store: &S, id: i64) -> Result<(), ApiError>
where
  S: BestiaryStore,
{
  store
    .get_species(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(|_| ())
    .ok_or_else(|| ApiError::NotFound(format!("species {id} not found")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub order: Option<SortOrder>,
}

/// `GET /species/:id/comments[?order=asc|desc]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ApiViewer(viewer): ApiViewer,
  Path(species_id): Path<i64>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CommentView>>, ApiError>
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_species(store.as_ref(), species_id).await?;

  let mut thread = CommentThread::new(species_id, viewer.profile_id)
    .with_order(params.order.unwrap_or_default());
  thread.open(store.as_ref()).await?;

  let rows = thread
    .rows()
    .map(|row| CommentView {
      comment:    row.comment.clone(),
      can_delete: row.can_delete,
    })
    .collect();
  Ok(Json(rows))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewCommentBody {
  pub comment: String,
}

/// `POST /species/:id/comments` — returns 201 + the stored [`Comment`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiViewer(viewer): ApiViewer,
  Path(species_id): Path<i64>,
  Json(body): Json<NewCommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_species(store.as_ref(), species_id).await?;

  let mut thread = CommentThread::new(species_id, viewer.profile_id);
  thread.set_draft(body.comment);
  let comment = thread.post(store.as_ref()).await?;
  Ok((StatusCode::CREATED, Json(comment)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /species/:id/comments/:comment_id`
///
/// A comment by someone else is left untouched and reported as
/// `{"deleted":0}`.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  ApiViewer(viewer): ApiViewer,
  Path((species_id, comment_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError>
where
  S: BestiaryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut thread = CommentThread::new(species_id, viewer.profile_id);
  let deleted = thread.delete(store.as_ref(), comment_id).await?;
  Ok(Json(json!({ "deleted": deleted })))
}
