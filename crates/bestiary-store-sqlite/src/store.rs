//! [`SqliteStore`] — the SQLite implementation of [`BestiaryStore`].

use std::path::Path;

use bestiary_core::{
  comment::{Comment, NewComment},
  profile::{Credentials, NewProfile, Profile, Session},
  species::{NewSpecies, Species},
  store::BestiaryStore,
};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    COMMENT_COLUMNS, PROFILE_COLUMNS, RawComment, RawProfile, RawSpecies,
    SPECIES_COLUMNS, decode_uuid, encode_dt, encode_kingdom, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Bestiary store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Remove sessions that expired at or before `now`. Returns rows removed.
  pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
    let now_str = encode_dt(now);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![now_str],
        )?)
      })
      .await?;
    Ok(removed)
  }
}

// ─── BestiaryStore impl ──────────────────────────────────────────────────────

impl BestiaryStore for SqliteStore {
  type Error = Error;

  // ── Species ───────────────────────────────────────────────────────────────

  async fn add_species(&self, input: NewSpecies) -> Result<Species> {
    let scientific_name  = input.scientific_name.clone();
    let common_name      = input.common_name.clone();
    let kingdom_str      = encode_kingdom(input.kingdom);
    let total_population = input.total_population;
    let description      = input.description.clone();
    let image            = input.image.clone();
    let author_str       = encode_uuid(input.author);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO species (
             scientific_name, common_name, kingdom, total_population,
             description, image, author
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            scientific_name,
            common_name,
            kingdom_str,
            total_population,
            description,
            image,
            author_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Species {
      id,
      scientific_name:  input.scientific_name,
      common_name:      input.common_name,
      kingdom:          input.kingdom,
      total_population: input.total_population,
      description:      input.description,
      image:            input.image,
      author:           input.author,
    })
  }

  async fn get_species(&self, id: i64) -> Result<Option<Species>> {
    let raw: Option<RawSpecies> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SPECIES_COLUMNS} FROM species WHERE id = ?1"),
            rusqlite::params![id],
            RawSpecies::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSpecies::into_species).transpose()
  }

  async fn list_species(&self) -> Result<Vec<Species>> {
    let raws: Vec<RawSpecies> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {SPECIES_COLUMNS} FROM species ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawSpecies::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSpecies::into_species).collect()
  }

  async fn delete_species(&self, id: i64) -> Result<usize> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM species WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(removed)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, input: NewComment) -> Result<Comment> {
    let created_at = Utc::now();

    let species_id     = input.species_id;
    let author_str     = encode_uuid(input.author);
    let display_name   = input.display_name.clone();
    let text           = input.comment.clone();
    let created_at_str = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (species_id, author, display_name, comment, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![species_id, author_str, display_name, text, created_at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Comment {
      id,
      species_id,
      author: input.author,
      display_name: input.display_name,
      comment: input.comment,
      created_at,
    })
  }

  async fn list_comments(&self, species_id: i64) -> Result<Vec<Comment>> {
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS} FROM comments WHERE species_id = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![species_id], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn delete_comment(&self, id: i64, species_id: i64, author: Uuid) -> Result<usize> {
    let author_str = encode_uuid(author);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM comments WHERE id = ?1 AND species_id = ?2 AND author = ?3",
          rusqlite::params![id, species_id, author_str],
        )?)
      })
      .await?;
    Ok(removed)
  }

  async fn delete_comments_for_species(&self, species_id: i64) -> Result<usize> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM comments WHERE species_id = ?1",
          rusqlite::params![species_id],
        )?)
      })
      .await?;
    Ok(removed)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn add_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = Profile {
      id:           Uuid::new_v4(),
      display_name: input.display_name,
      email:        input.email,
      biography:    input.biography,
    };

    let id_str        = encode_uuid(profile.id);
    let display_name  = profile.display_name.clone();
    let email         = profile.email.clone();
    let biography     = profile.biography.clone();
    let password_hash = input.password_hash;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (id, display_name, email, biography, password_hash)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, display_name, email, biography, password_hash],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
            rusqlite::params![id_str],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY id DESC"))?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn credentials_by_email(&self, email: &str) -> Result<Option<Credentials>> {
    let email = email.trim().to_owned();

    let raw: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, password_hash FROM profiles WHERE email = ?1",
            rusqlite::params![email],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(id, password_hash)| {
        Ok(Credentials { profile_id: decode_uuid(&id)?, password_hash })
      })
      .transpose()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(&self, session: Session) -> Result<()> {
    let token_hash     = session.token_hash;
    let profile_id_str = encode_uuid(session.profile_id);
    let created_at_str = encode_dt(session.created_at);
    let expires_at_str = encode_dt(session.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, profile_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_hash, profile_id_str, created_at_str, expires_at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn session_profile(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<Uuid>> {
    let token_hash = token_hash.to_owned();
    let now_str    = encode_dt(now);

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT profile_id FROM sessions WHERE token_hash = ?1 AND expires_at > ?2",
            rusqlite::params![token_hash, now_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    raw.map(|id| decode_uuid(&id)).transpose()
  }

  async fn delete_session(&self, token_hash: &str) -> Result<usize> {
    let token_hash = token_hash.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?)
      })
      .await?;
    Ok(removed)
  }
}
