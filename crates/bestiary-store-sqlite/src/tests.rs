//! Integration tests for `SqliteStore` against an in-memory database.

use bestiary_core::{
  comment::NewComment,
  deletion::{StepOutcome, delete_species},
  profile::{NewProfile, Session},
  species::{Kingdom, NewSpecies},
  store::BestiaryStore,
  thread::CommentThread,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_profile(name: &str, email: &str) -> NewProfile {
  NewProfile {
    display_name:  name.into(),
    email:         email.into(),
    biography:     Some(format!("{name} likes birds")),
    password_hash: "$argon2id$v=19$placeholder".into(),
  }
}

fn comment_by(species_id: i64, author: Uuid, name: &str, text: &str) -> NewComment {
  NewComment {
    species_id,
    author,
    display_name: name.into(),
    comment:      text.into(),
  }
}

// ─── Species ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_species() {
  let s = store().await;
  let author = Uuid::new_v4();

  let mut input = NewSpecies::new("Panthera leo", Kingdom::Animalia, author);
  input.common_name = Some("Lion".into());
  input.total_population = Some(23_000);
  input.description = Some("Large cat of the savanna.".into());
  let species = s.add_species(input).await.unwrap();

  let fetched = s.get_species(species.id).await.unwrap().unwrap();
  assert_eq!(fetched, species);
  assert_eq!(fetched.kingdom, Kingdom::Animalia);
  assert_eq!(fetched.author, author);
  assert!(fetched.image.is_none());
}

#[tokio::test]
async fn get_species_missing_returns_none() {
  let s = store().await;
  assert!(s.get_species(999).await.unwrap().is_none());
}

#[tokio::test]
async fn list_species_is_ordered_by_id() {
  let s = store().await;
  let author = Uuid::new_v4();
  for name in ["Quercus robur", "Amanita muscaria", "Escherichia coli"] {
    s.add_species(NewSpecies::new(name, Kingdom::Plantae, author))
      .await
      .unwrap();
  }

  let all = s.list_species().await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all.windows(2).all(|w| w[0].id < w[1].id));
  assert_eq!(all[0].scientific_name, "Quercus robur");
}

#[tokio::test]
async fn delete_species_leaves_comments_for_caller() {
  let s = store().await;
  let author = Uuid::new_v4();
  let sp = s
    .add_species(NewSpecies::new("Canis lupus", Kingdom::Animalia, author))
    .await
    .unwrap();
  s.add_comment(comment_by(sp.id, author, "Alice", "howl"))
    .await
    .unwrap();

  assert_eq!(s.delete_species(sp.id).await.unwrap(), 1);
  assert_eq!(s.delete_species(sp.id).await.unwrap(), 0);
  assert_eq!(s.list_comments(sp.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn species_deletion_flow_removes_every_comment() {
  let s = store().await;
  let author = Uuid::new_v4();
  let sp = s
    .add_species(NewSpecies::new("Apis mellifera", Kingdom::Animalia, author))
    .await
    .unwrap();
  let other = s
    .add_species(NewSpecies::new("Bombus terrestris", Kingdom::Animalia, author))
    .await
    .unwrap();
  for i in 0..5 {
    s.add_comment(comment_by(sp.id, author, "Alice", &format!("buzz {i}")))
      .await
      .unwrap();
  }
  s.add_comment(comment_by(other.id, author, "Alice", "different bee"))
    .await
    .unwrap();

  let report = delete_species(&s, sp.id).await;

  assert_eq!(report.species, StepOutcome::Done { rows: 1 });
  assert_eq!(report.comments, StepOutcome::Done { rows: 5 });
  assert!(s.list_comments(sp.id).await.unwrap().is_empty());
  assert_eq!(s.list_comments(other.id).await.unwrap().len(), 1);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_comment_assigns_id_and_timestamp() {
  let s = store().await;
  let author = Uuid::new_v4();
  let before = Utc::now();

  let c = s
    .add_comment(comment_by(7, author, "Alice", "hello"))
    .await
    .unwrap();

  assert!(c.id > 0);
  assert!(c.created_at >= before);

  let listed = s.list_comments(7).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].comment, "hello");
  assert_eq!(listed[0].display_name, "Alice");
  assert_eq!(listed[0].author, author);
  // Stored at microsecond precision.
  assert_eq!(
    listed[0].created_at.timestamp_micros(),
    c.created_at.timestamp_micros()
  );
}

#[tokio::test]
async fn delete_comment_requires_matching_author_and_species() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let c = s
    .add_comment(comment_by(1, alice, "Alice", "mine"))
    .await
    .unwrap();

  assert_eq!(s.delete_comment(c.id, 1, bob).await.unwrap(), 0);
  assert_eq!(s.delete_comment(c.id, 2, alice).await.unwrap(), 0);
  assert_eq!(s.list_comments(1).await.unwrap().len(), 1);

  assert_eq!(s.delete_comment(c.id, 1, alice).await.unwrap(), 1);
  assert!(s.list_comments(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn thread_over_sqlite_posts_and_lists() {
  let s = store().await;
  let alice = s
    .add_profile(new_profile("Alice", "alice@example.com"))
    .await
    .unwrap();
  let sp = s
    .add_species(NewSpecies::new("Corvus corax", Kingdom::Animalia, alice.id))
    .await
    .unwrap();

  let mut thread = CommentThread::new(sp.id, alice.id);
  thread.open(&s).await.unwrap();
  thread.set_draft("hello");
  thread.post(&s).await.unwrap();

  assert_eq!(thread.comments().len(), 1);
  assert_eq!(thread.comments()[0].display_name, "Alice");
  assert_eq!(thread.comments()[0].comment, "hello");
  assert!(thread.rows().all(|r| r.can_delete));
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profiles_list_by_id_descending() {
  let s = store().await;
  for (name, email) in [
    ("Alice", "alice@example.com"),
    ("Bob", "bob@example.com"),
    ("Carol", "carol@example.com"),
  ] {
    s.add_profile(new_profile(name, email)).await.unwrap();
  }

  let profiles = s.list_profiles().await.unwrap();
  assert_eq!(profiles.len(), 3);
  assert!(profiles.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
async fn get_profile_roundtrip() {
  let s = store().await;
  let p = s
    .add_profile(new_profile("Alice", "alice@example.com"))
    .await
    .unwrap();

  let fetched = s.get_profile(p.id).await.unwrap().unwrap();
  assert_eq!(fetched, p);
  assert!(s.get_profile(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn credentials_lookup_ignores_email_case() {
  let s = store().await;
  let p = s
    .add_profile(new_profile("Alice", "Alice@Example.com"))
    .await
    .unwrap();

  let creds = s
    .credentials_by_email("alice@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(creds.profile_id, p.id);
  assert_eq!(creds.password_hash, "$argon2id$v=19$placeholder");
  assert!(s.credentials_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.add_profile(new_profile("Alice", "alice@example.com"))
    .await
    .unwrap();
  assert!(
    s.add_profile(new_profile("Alice Again", "ALICE@example.com"))
      .await
      .is_err()
  );
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sessions_resolve_until_expiry() {
  let s = store().await;
  let p = s
    .add_profile(new_profile("Alice", "alice@example.com"))
    .await
    .unwrap();
  let now = Utc::now();

  s.create_session(Session {
    token_hash: "live".into(),
    profile_id: p.id,
    created_at: now,
    expires_at: now + Duration::hours(1),
  })
  .await
  .unwrap();
  s.create_session(Session {
    token_hash: "stale".into(),
    profile_id: p.id,
    created_at: now - Duration::hours(2),
    expires_at: now - Duration::hours(1),
  })
  .await
  .unwrap();

  assert_eq!(s.session_profile("live", now).await.unwrap(), Some(p.id));
  assert_eq!(s.session_profile("stale", now).await.unwrap(), None);
  assert_eq!(s.session_profile("unknown", now).await.unwrap(), None);
  assert_eq!(
    s.session_profile("live", now + Duration::hours(2)).await.unwrap(),
    None
  );

  assert_eq!(s.purge_expired_sessions(now).await.unwrap(), 1);
  assert_eq!(s.delete_session("live").await.unwrap(), 1);
  assert_eq!(s.session_profile("live", now).await.unwrap(), None);
}
