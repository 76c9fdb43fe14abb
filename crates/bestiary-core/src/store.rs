//! The `BestiaryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `bestiary-store-sqlite`).
//! Higher layers (`bestiary-api`, `bestiary-web`) receive a store as injected
//! state and never construct one per request.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  comment::{Comment, NewComment},
  profile::{Credentials, NewProfile, Profile, Session},
  species::{NewSpecies, Species},
};

/// Abstraction over a Bestiary store backend.
///
/// Deletes report the number of rows removed; a filter that matches nothing
/// is not an error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BestiaryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Species ───────────────────────────────────────────────────────────

  fn add_species(
    &self,
    input: NewSpecies,
  ) -> impl Future<Output = Result<Species, Self::Error>> + Send + '_;

  /// Retrieve a species by id. Returns `None` if not found.
  fn get_species(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Species>, Self::Error>> + Send + '_;

  /// All species, ordered by id.
  fn list_species(
    &self,
  ) -> impl Future<Output = Result<Vec<Species>, Self::Error>> + Send + '_;

  /// Delete the species row only. Dependent comments are left in place; see
  /// [`crate::deletion::delete_species`].
  fn delete_species(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Insert a comment. `id` and `created_at` are assigned by the store.
  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// All comments on a species, in no particular order.
  fn list_comments(
    &self,
    species_id: i64,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  /// Delete one comment, only if `species_id` and `author` both match the
  /// stored row.
  fn delete_comment(
    &self,
    id: i64,
    species_id: i64,
    author: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn delete_comments_for_species(
    &self,
    species_id: i64,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  fn add_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// All profiles, ordered by id descending.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Look up login credentials by (case-insensitive) email.
  fn credentials_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn create_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a token digest to its profile, ignoring sessions that expired
  /// at or before `now`.
  fn session_profile<'a>(
    &'a self,
    token_hash: &'a str,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + 'a;

  fn delete_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;
}
