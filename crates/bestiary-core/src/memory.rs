//! In-memory [`BestiaryStore`] with failure injection, for tests.
//!
//! Enabled in downstream crates through the `test-util` feature.

use std::{
  collections::HashSet,
  sync::Mutex,
};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  comment::{Comment, NewComment},
  profile::{Credentials, NewProfile, Profile, Session},
  species::{NewSpecies, Species},
  store::BestiaryStore,
};

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fail {
  DeleteSpecies,
  DeleteComments,
  AddComment,
  ListComments,
  GetProfile,
}

#[derive(Debug, Error)]
#[error("injected failure: {0:?}")]
pub struct MemoryError(Fail);

#[derive(Default)]
struct Tables {
  species:   Vec<Species>,
  comments:  Vec<Comment>,
  profiles:  Vec<(Profile, String)>,
  sessions:  Vec<Session>,
  next_id:   i64,
  /// Each inserted comment is one second newer than the previous one.
  clock:     Option<DateTime<Utc>>,
  failing:   HashSet<Fail>,
  list_hits: usize,
}

#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn fail(&self, op: Fail) { self.tables.lock().unwrap().failing.insert(op); }

  pub fn heal(&self, op: Fail) { self.tables.lock().unwrap().failing.remove(&op); }

  /// How many times `list_comments` has been called.
  pub fn list_hits(&self) -> usize { self.tables.lock().unwrap().list_hits }

  fn check(&self, op: Fail) -> Result<(), MemoryError> {
    if self.tables.lock().unwrap().failing.contains(&op) {
      Err(MemoryError(op))
    } else {
      Ok(())
    }
  }
}

impl Tables {
  fn next_id(&mut self) -> i64 {
    self.next_id += 1;
    self.next_id
  }

  fn tick(&mut self) -> DateTime<Utc> {
    let now = match self.clock {
      Some(t) => t + Duration::seconds(1),
      None => Utc::now(),
    };
    self.clock = Some(now);
    now
  }
}

impl BestiaryStore for MemoryStore {
  type Error = MemoryError;

  async fn add_species(&self, input: NewSpecies) -> Result<Species, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    let species = Species {
      id:               t.next_id(),
      scientific_name:  input.scientific_name,
      common_name:      input.common_name,
      kingdom:          input.kingdom,
      total_population: input.total_population,
      description:      input.description,
      image:            input.image,
      author:           input.author,
    };
    t.species.push(species.clone());
    Ok(species)
  }

  async fn get_species(&self, id: i64) -> Result<Option<Species>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(t.species.iter().find(|s| s.id == id).cloned())
  }

  async fn list_species(&self) -> Result<Vec<Species>, MemoryError> {
    Ok(self.tables.lock().unwrap().species.clone())
  }

  async fn delete_species(&self, id: i64) -> Result<usize, MemoryError> {
    self.check(Fail::DeleteSpecies)?;
    let mut t = self.tables.lock().unwrap();
    let before = t.species.len();
    t.species.retain(|s| s.id != id);
    Ok(before - t.species.len())
  }

  async fn add_comment(&self, input: NewComment) -> Result<Comment, MemoryError> {
    self.check(Fail::AddComment)?;
    let mut t = self.tables.lock().unwrap();
    let comment = Comment {
      id:           t.next_id(),
      species_id:   input.species_id,
      author:       input.author,
      display_name: input.display_name,
      comment:      input.comment,
      created_at:   t.tick(),
    };
    t.comments.push(comment.clone());
    Ok(comment)
  }

  async fn list_comments(&self, species_id: i64) -> Result<Vec<Comment>, MemoryError> {
    self.check(Fail::ListComments)?;
    let mut t = self.tables.lock().unwrap();
    t.list_hits += 1;
    Ok(
      t.comments
        .iter()
        .filter(|c| c.species_id == species_id)
        .cloned()
        .collect(),
    )
  }

  async fn delete_comment(
    &self,
    id: i64,
    species_id: i64,
    author: Uuid,
  ) -> Result<usize, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    let before = t.comments.len();
    t.comments
      .retain(|c| !(c.id == id && c.species_id == species_id && c.author == author));
    Ok(before - t.comments.len())
  }

  async fn delete_comments_for_species(&self, species_id: i64) -> Result<usize, MemoryError> {
    self.check(Fail::DeleteComments)?;
    let mut t = self.tables.lock().unwrap();
    let before = t.comments.len();
    t.comments.retain(|c| c.species_id != species_id);
    Ok(before - t.comments.len())
  }

  async fn add_profile(&self, input: NewProfile) -> Result<Profile, MemoryError> {
    let profile = Profile {
      id:           Uuid::new_v4(),
      display_name: input.display_name,
      email:        input.email,
      biography:    input.biography,
    };
    self
      .tables
      .lock()
      .unwrap()
      .profiles
      .push((profile.clone(), input.password_hash));
    Ok(profile)
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, MemoryError> {
    self.check(Fail::GetProfile)?;
    let t = self.tables.lock().unwrap();
    Ok(t.profiles.iter().find(|(p, _)| p.id == id).map(|(p, _)| p.clone()))
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>, MemoryError> {
    let t = self.tables.lock().unwrap();
    let mut profiles: Vec<Profile> = t.profiles.iter().map(|(p, _)| p.clone()).collect();
    profiles.sort_by(|a, b| b.id.cmp(&a.id));
    Ok(profiles)
  }

  async fn credentials_by_email(&self, email: &str) -> Result<Option<Credentials>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(
      t.profiles
        .iter()
        .find(|(p, _)| p.email.eq_ignore_ascii_case(email))
        .map(|(p, hash)| Credentials {
          profile_id:    p.id,
          password_hash: hash.clone(),
        }),
    )
  }

  async fn create_session(&self, session: Session) -> Result<(), MemoryError> {
    self.tables.lock().unwrap().sessions.push(session);
    Ok(())
  }

  async fn session_profile(
    &self,
    token_hash: &str,
    now: DateTime<Utc>,
  ) -> Result<Option<Uuid>, MemoryError> {
    let t = self.tables.lock().unwrap();
    Ok(
      t.sessions
        .iter()
        .find(|s| s.token_hash == token_hash && !s.is_expired(now))
        .map(|s| s.profile_id),
    )
  }

  async fn delete_session(&self, token_hash: &str) -> Result<usize, MemoryError> {
    let mut t = self.tables.lock().unwrap();
    let before = t.sessions.len();
    t.sessions.retain(|s| s.token_hash != token_hash);
    Ok(before - t.sessions.len())
  }
}
