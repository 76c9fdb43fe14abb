//! Profiles, credentials and sessions.
//!
//! A profile is the public face of a registered user. Credentials and
//! sessions are kept apart from it so that listing profiles can never leak
//! a password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user's public record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
  pub id:           Uuid,
  pub display_name: String,
  pub email:        String,
  pub biography:    Option<String>,
}

/// Input for [`BestiaryStore::add_profile`](crate::store::BestiaryStore::add_profile).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
  pub display_name:  String,
  pub email:         String,
  pub biography:     Option<String>,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// What the login path needs to check a password.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub profile_id:    Uuid,
  pub password_hash: String,
}

/// A login session. Only the SHA-256 digest of the cookie token is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub token_hash: String,
  pub profile_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }
}

/// The authenticated profile making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
  pub profile_id: Uuid,
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  #[test]
  fn session_expiry_is_inclusive() {
    let now = Utc::now();
    let s = Session {
      token_hash: "ab".into(),
      profile_id: Uuid::new_v4(),
      created_at: now - Duration::hours(1),
      expires_at: now,
    };
    assert!(s.is_expired(now));
    assert!(!s.is_expired(now - Duration::seconds(1)));
  }
}
