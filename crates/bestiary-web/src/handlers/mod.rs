pub mod detail;
pub mod session;
pub mod species;
pub mod users;

use axum::{
  http::{HeaderValue, header},
  response::{IntoResponse, Redirect, Response},
};

/// 303 redirect that also sets a cookie.
pub(super) fn redirect_with_cookie(to: &str, cookie: &str) -> Response {
  let mut res = Redirect::to(to).into_response();
  if let Ok(value) = HeaderValue::from_str(cookie) {
    res.headers_mut().insert(header::SET_COOKIE, value);
  }
  res
}
