//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::html::error_page;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found")]
  NotFound,
  #[error("password hashing error: {0}")]
  Password(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"bestiary\""),
        );
        res
      }
      Error::NotFound => {
        (StatusCode::NOT_FOUND, error_page("Not Found", "Nothing lives here.")).into_response()
      }
      Error::Password(msg) => {
        tracing::error!(%msg, "password hashing failed");
        (StatusCode::INTERNAL_SERVER_ERROR, error_page("Something went wrong.", &msg))
          .into_response()
      }
      Error::Store(e) => {
        tracing::warn!(error = %e, "store error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          error_page("Something went wrong.", &e.to_string()),
        )
          .into_response()
      }
    }
  }
}
