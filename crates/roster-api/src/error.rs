//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"type": ..., "message": ...}`.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use roster_core::store::{ErrorKind, StoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("access is denied")]
  Forbidden,

  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store failure.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.kind() {
      ErrorKind::Conflict => ApiError::Conflict(e.to_string()),
      ErrorKind::Invalid => ApiError::BadRequest(e.to_string()),
      ErrorKind::Other => ApiError::Store(Box::new(e)),
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "EntityNotFoundException",
      ApiError::BadRequest(_) => "BadRequest",
      ApiError::Unauthorized => "Unauthorized",
      ApiError::Forbidden => "AccessDenied",
      ApiError::Conflict(_) => "Conflict",
      ApiError::Store(_) => "StoreError",
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden => StatusCode::FORBIDDEN,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<roster_core::Error> for ApiError {
  fn from(e: roster_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let ApiError::Store(e) = &self {
      tracing::error!(error = %e, "store failure");
    }
    let body = Json(json!({ "type": self.kind(), "message": self.to_string() }));
    let mut res = (self.status(), body).into_response();
    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"roster\""),
      );
    }
    res
  }
}
