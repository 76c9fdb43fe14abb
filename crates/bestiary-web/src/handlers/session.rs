//! Sign-in page, login and logout.

use axum::{
  Form,
  extract::{Query, State},
  http::HeaderMap,
  response::{IntoResponse, Redirect, Response},
};
use bestiary_core::store::BestiaryStore;
use serde::Deserialize;

use crate::{
  AppState,
  auth::{self, SESSION_COOKIE},
  error::Error,
  handlers::redirect_with_cookie,
  notice::{Notice, NoticeCode},
  views,
};

#[derive(Debug, Deserialize, Default)]
pub struct StartParams {
  pub notice: Option<NoticeCode>,
}

/// `GET /` — the sign-in form, or a redirect to the species list when a
/// session is already active.
pub async fn start<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Query(params): Query<StartParams>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if auth::resolve_viewer(&headers, state.store.as_ref()).await?.is_some() {
    return Ok(Redirect::to("/species").into_response());
  }
  let notice = params.notice.map(|c| c.into_notice(None));
  Ok(views::login(notice.as_ref(), "").into_response())
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  pub email:    String,
  pub password: String,
}

/// `POST /login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Form(form): Form<LoginForm>,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ttl = state.config.session_ttl_hours;
  match auth::login(state.store.as_ref(), &form.email, &form.password, ttl).await? {
    Some(token) => {
      let cookie = auth::session_cookie(&token, ttl, state.config.secure_cookies);
      Ok(redirect_with_cookie("/species", &cookie))
    }
    None => {
      tracing::info!(email = %form.email, "rejected sign-in");
      let notice = Notice::destructive("Sign in failed.", "Email or password is incorrect.");
      Ok(views::login(Some(&notice), &form.email).into_response())
    }
  }
}

/// `POST /logout`
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: BestiaryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(token) = auth::cookie_value(&headers, SESSION_COOKIE) {
    state
      .store
      .delete_session(&auth::hash_token(token))
      .await
      .map_err(Error::store)?;
  }
  let to = format!("/?notice={}", NoticeCode::SignedOut.as_query());
  Ok(redirect_with_cookie(&to, &auth::clear_session_cookie(state.config.secure_cookies)))
}
