//! Comments attached to species.
//!
//! A comment is immutable once written. The author's display name is copied
//! in at write time so later profile renames do not rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format used when rendering a comment's creation time.
pub const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// A stored comment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id:           i64,
  pub species_id:   i64,
  /// Profile id of the author; the only field used for authorization.
  pub author:       Uuid,
  /// Snapshot of the author's display name when the comment was posted.
  pub display_name: String,
  pub comment:      String,
  pub created_at:   DateTime<Utc>,
}

impl Comment {
  /// Whether `viewer` may delete this comment.
  pub fn is_authored_by(&self, viewer: Uuid) -> bool { self.author == viewer }

  pub fn formatted_timestamp(&self) -> String {
    format!("{} UTC", self.created_at.format(TIMESTAMP_FORMAT))
  }
}

/// Input for [`BestiaryStore::add_comment`](crate::store::BestiaryStore::add_comment).
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
  pub species_id:   i64,
  pub author:       Uuid,
  pub display_name: String,
  pub comment:      String,
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// Display order of a comment list, by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  /// Oldest first.
  #[serde(alias = "asc")]
  Ascending,
  /// Newest first.
  #[default]
  #[serde(alias = "desc")]
  Descending,
}

impl SortOrder {
  pub fn toggled(self) -> Self {
    match self {
      Self::Ascending => Self::Descending,
      Self::Descending => Self::Ascending,
    }
  }

  /// Label for the toggle control, describing the current order.
  pub fn label(self) -> &'static str {
    match self {
      Self::Ascending => "Showing Oldest First",
      Self::Descending => "Showing Newest First",
    }
  }

  /// Short form used in query strings.
  pub fn as_query(self) -> &'static str {
    match self {
      Self::Ascending => "asc",
      Self::Descending => "desc",
    }
  }
}

/// Sort `comments` in place by `(created_at, id)` in the requested order.
///
/// The id tiebreak keeps the order total, so re-sorting is idempotent.
pub fn sort_comments(comments: &mut [Comment], order: SortOrder) {
  comments.sort_by(|a, b| {
    (a.created_at, a.id).cmp(&(b.created_at, b.id))
  });
  if order == SortOrder::Descending {
    comments.reverse();
  }
}
