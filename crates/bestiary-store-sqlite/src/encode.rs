//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so they compare correctly as text. UUIDs are stored
//! as hyphenated lowercase strings. Kingdoms are stored by their Latin name.

use std::str::FromStr;

use bestiary_core::{
  comment::Comment,
  profile::Profile,
  species::{Kingdom, Species},
};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Kingdom ──────────────────────────────────────────────────────────────────

pub fn encode_kingdom(k: Kingdom) -> String { k.as_ref().to_owned() }

pub fn decode_kingdom(s: &str) -> Result<Kingdom> {
  Kingdom::from_str(s).map_err(|_| Error::UnknownKingdom(s.to_owned()))
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// A species row as read from SQLite, before decoding.
pub struct RawSpecies {
  pub id:               i64,
  pub scientific_name:  String,
  pub common_name:      Option<String>,
  pub kingdom:          String,
  pub total_population: Option<i64>,
  pub description:      Option<String>,
  pub image:            Option<String>,
  pub author:           String,
}

pub const SPECIES_COLUMNS: &str = "id, scientific_name, common_name, kingdom, \
   total_population, description, image, author";

impl RawSpecies {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      scientific_name:  row.get(1)?,
      common_name:      row.get(2)?,
      kingdom:          row.get(3)?,
      total_population: row.get(4)?,
      description:      row.get(5)?,
      image:            row.get(6)?,
      author:           row.get(7)?,
    })
  }

  pub fn into_species(self) -> Result<Species> {
    Ok(Species {
      id:               self.id,
      scientific_name:  self.scientific_name,
      common_name:      self.common_name,
      kingdom:          decode_kingdom(&self.kingdom)?,
      total_population: self.total_population,
      description:      self.description,
      image:            self.image,
      author:           decode_uuid(&self.author)?,
    })
  }
}

/// A comment row as read from SQLite, before decoding.
pub struct RawComment {
  pub id:           i64,
  pub species_id:   i64,
  pub author:       String,
  pub display_name: String,
  pub comment:      String,
  pub created_at:   String,
}

pub const COMMENT_COLUMNS: &str =
  "id, species_id, author, display_name, comment, created_at";

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      species_id:   row.get(1)?,
      author:       row.get(2)?,
      display_name: row.get(3)?,
      comment:      row.get(4)?,
      created_at:   row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:           self.id,
      species_id:   self.species_id,
      author:       decode_uuid(&self.author)?,
      display_name: self.display_name,
      comment:      self.comment,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// A profile row as read from SQLite, before decoding.
pub struct RawProfile {
  pub id:           String,
  pub display_name: String,
  pub email:        String,
  pub biography:    Option<String>,
}

pub const PROFILE_COLUMNS: &str = "id, display_name, email, biography";

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      display_name: row.get(1)?,
      email:        row.get(2)?,
      biography:    row.get(3)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:           decode_uuid(&self.id)?,
      display_name: self.display_name,
      email:        self.email,
      biography:    self.biography,
    })
  }
}
