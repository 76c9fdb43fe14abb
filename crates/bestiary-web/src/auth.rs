//! Sessions, password checks and viewer extraction.
//!
//! A viewer is resolved from either the session cookie or an HTTP Basic
//! `email:password` header. Pages that need a viewer use [`PageViewer`],
//! which redirects to `/` when there is none; the JSON API gets the viewer
//! through [`attach_viewer`].

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, header, request::Parts},
  middleware::Next,
  response::{IntoResponse, Redirect, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use bestiary_core::{
  profile::{Session, Viewer},
  store::BestiaryStore,
};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{AppState, error::Error};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "bestiary_session";

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Produce an argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Password(e.to_string()))
}

/// Hash checked against when an email is unknown, so a miss costs the same
/// as a wrong password.
static DUMMY_HASH: LazyLock<String> =
  LazyLock::new(|| hash_password("bestiary-dummy-password").unwrap_or_default());

pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Session tokens ──────────────────────────────────────────────────────────

/// A fresh 256-bit session token, hex encoded.
pub fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The digest under which a token is stored.
pub fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, ttl_hours: i64, secure: bool) -> String {
  let mut cookie = format!(
    "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
    ttl_hours.saturating_mul(3600)
  );
  if secure {
    cookie.push_str("; Secure");
  }
  cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
  let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
  if secure {
    cookie.push_str("; Secure");
  }
  cookie
}

/// Find the value of cookie `name` across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(k, _)| *k == name)
    .map(|(_, v)| v)
    .filter(|v| !v.is_empty())
}

// ─── Login ───────────────────────────────────────────────────────────────────

/// Check `email`/`password` and, if they match, persist a new session.
///
/// Returns the raw token to hand to the client, or `None` for bad
/// credentials.
pub async fn login<S>(
  store: &S,
  email: &str,
  password: &str,
  ttl_hours: i64,
) -> Result<Option<String>, Error>
where
  S: BestiaryStore,
{
  let Some(creds) = store.credentials_by_email(email).await.map_err(Error::store)? else {
    verify_password(password, &DUMMY_HASH);
    return Ok(None);
  };
  if !verify_password(password, &creds.password_hash) {
    return Ok(None);
  }

  let token = generate_token();
  let now = Utc::now();
  store
    .create_session(Session {
      token_hash: hash_token(&token),
      profile_id: creds.profile_id,
      created_at: now,
      expires_at: now + Duration::hours(ttl_hours),
    })
    .await
    .map_err(Error::store)?;

  tracing::info!(profile_id = %creds.profile_id, "signed in");
  Ok(Some(token))
}

// ─── Viewer resolution ───────────────────────────────────────────────────────

/// Verify HTTP Basic `email:password` credentials directly from headers.
pub async fn verify_basic<S>(headers: &HeaderMap, store: &S) -> Result<Viewer, Error>
where
  S: BestiaryStore,
{
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let Some(found) = store.credentials_by_email(email).await.map_err(Error::store)? else {
    verify_password(password, &DUMMY_HASH);
    return Err(Error::Unauthorized);
  };

  if !verify_password(password, &found.password_hash) {
    return Err(Error::Unauthorized);
  }

  Ok(Viewer { profile_id: found.profile_id })
}

/// Resolve the viewer for a request: session cookie first, then Basic auth.
pub async fn resolve_viewer<S>(headers: &HeaderMap, store: &S) -> Result<Option<Viewer>, Error>
where
  S: BestiaryStore,
{
  if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
    let found = store
      .session_profile(&hash_token(token), Utc::now())
      .await
      .map_err(Error::store)?;
    if let Some(profile_id) = found {
      return Ok(Some(Viewer { profile_id }));
    }
  }

  if headers.contains_key(header::AUTHORIZATION) {
    return match verify_basic(headers, store).await {
      Ok(viewer) => Ok(Some(viewer)),
      Err(Error::Unauthorized) => Ok(None),
      Err(e) => Err(e),
    };
  }

  Ok(None)
}

/// A signed-in viewer on a server-rendered page. Requests without one are
/// redirected to `/`.
pub struct PageViewer(pub Viewer);

impl<S> FromRequestParts<AppState<S>> for PageViewer
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Response;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    match resolve_viewer(&parts.headers, state.store.as_ref()).await {
      Ok(Some(viewer)) => Ok(PageViewer(viewer)),
      Ok(None) => Err(Redirect::to("/").into_response()),
      Err(e) => Err(e.into_response()),
    }
  }
}

/// Middleware for the JSON API: insert the resolved [`Viewer`] into request
/// extensions when there is one. Rejection is left to the API handlers.
pub async fn attach_viewer<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Response
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  match resolve_viewer(req.headers(), state.store.as_ref()).await {
    Ok(Some(viewer)) => {
      req.extensions_mut().insert(viewer);
    }
    Ok(None) => {}
    Err(e) => return e.into_response(),
  }
  next.run(req).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn password_hash_verifies() {
    let phc = hash_password("secret").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(verify_password("secret", &phc));
    assert!(!verify_password("wrong", &phc));
    assert!(!verify_password("secret", "not a phc string"));
  }

  #[test]
  fn dummy_hash_is_a_real_argon2_hash() {
    assert!(PasswordHash::new(&DUMMY_HASH).is_ok());
    assert!(!verify_password("", &DUMMY_HASH));
  }

  #[tokio::test]
  async fn unknown_email_is_a_plain_miss() {
    use bestiary_core::memory::MemoryStore;

    let store = MemoryStore::default();
    let token = login(&store, "nobody@example.com", "secret", 1).await.unwrap();
    assert!(token.is_none());
  }

  #[test]
  fn tokens_are_random_and_hash_stably() {
    let a = generate_token();
    let b = generate_token();
    assert_eq!(a.len(), 64);
    assert_ne!(a, b);
    assert_eq!(hash_token(&a), hash_token(&a));
    assert_ne!(hash_token(&a), a);
  }

  #[test]
  fn cookie_lookup_across_pairs_and_headers() {
    let mut headers = HeaderMap::new();
    headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; other=1"));
    headers.append(
      header::COOKIE,
      HeaderValue::from_static("lang=en;  bestiary_session=abc123 ; x=y"),
    );
    assert_eq!(cookie_value(&headers, SESSION_COOKIE), Some("abc123"));
    assert_eq!(cookie_value(&headers, "theme"), Some("dark"));
    assert_eq!(cookie_value(&headers, "missing"), None);
  }

  #[test]
  fn empty_cookie_value_is_absent() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("bestiary_session="));
    assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);
  }

  #[test]
  fn cookie_attributes() {
    let c = session_cookie("tok", 2, false);
    assert!(c.starts_with("bestiary_session=tok;"));
    assert!(c.contains("HttpOnly"));
    assert!(c.contains("Max-Age=7200"));
    assert!(!c.contains("Secure"));
    assert!(session_cookie("tok", 2, true).ends_with("; Secure"));
    assert!(clear_session_cookie(false).contains("Max-Age=0"));
  }
}
