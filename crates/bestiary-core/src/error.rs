//! Error types for `bestiary-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("species not found: {0}")]
  SpeciesNotFound(i64),

  #[error("profile not found: {0}")]
  ProfileNotFound(Uuid),

  #[error("comment text must not be empty")]
  EmptyComment,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error coming out of a [`BestiaryStore`](crate::store::BestiaryStore).
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
