//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum Error {
  /// No or rejected credentials; the browser is asked to prompt.
  #[error("unauthorized")]
  Unauthorized,
  #[error("forbidden")]
  Forbidden,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("render error: {0}")]
  Render(String),
  #[error("backend error: {0}")]
  Backend(#[from] BackendError),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"roster\""),
        );
        res
      }
      Error::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Render(msg) => {
        tracing::error!(%msg, "failed to render page");
        (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
      }
      Error::Backend(e) => {
        (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<roster_core::Error> for Error {
  fn from(e: roster_core::Error) -> Self { Error::BadRequest(e.to_string()) }
}
