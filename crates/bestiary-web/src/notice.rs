//! Transient notices shown at the top of a page.
//!
//! Successful form posts redirect with a `?notice=` code; failures render
//! the page directly with a destructive notice carrying the error text.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
  Default,
  Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub title:       String,
  pub description: String,
  pub variant:     NoticeVariant,
}

impl Notice {
  pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      variant:     NoticeVariant::Default,
    }
  }

  pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      variant:     NoticeVariant::Destructive,
    }
  }

  /// The generic failure notice for a backend error.
  pub fn failure(e: &impl std::fmt::Display) -> Self {
    Self::destructive("Something went wrong.", e.to_string())
  }
}

/// Codes carried across a redirect in the `notice` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCode {
  SpeciesDeleted,
  CommentAdded,
  CommentDeleted,
  CommentNotDeleted,
  SignedOut,
}

impl NoticeCode {
  pub fn as_query(self) -> &'static str {
    match self {
      Self::SpeciesDeleted => "species_deleted",
      Self::CommentAdded => "comment_added",
      Self::CommentDeleted => "comment_deleted",
      Self::CommentNotDeleted => "comment_not_deleted",
      Self::SignedOut => "signed_out",
    }
  }

  /// Expand a code into a notice. `subject` is the scientific name of the
  /// species the notice is about, when known.
  pub fn into_notice(self, subject: Option<&str>) -> Notice {
    match self {
      Self::SpeciesDeleted => Notice::info(
        "Species deleted!",
        match subject {
          Some(name) => format!("Successfully deleted {name}."),
          None => "Successfully deleted the species.".to_string(),
        },
      ),
      Self::CommentAdded => Notice::info(
        "Comment added!",
        match subject {
          Some(name) => format!("Successfully commented on {name}."),
          None => "Successfully posted the comment.".to_string(),
        },
      ),
      Self::CommentDeleted => Notice::info("Comment deleted!", "Successfully deleted the comment."),
      Self::CommentNotDeleted => Notice::destructive(
        "Comment was not deleted.",
        "Only the author of a comment can delete it.",
      ),
      Self::SignedOut => Notice::info("Signed out.", "See you next time."),
    }
  }
}
