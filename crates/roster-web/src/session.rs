//! The signed-in caller of a UI request.
//!
//! The browser's Basic credentials are forwarded verbatim to the backend,
//! which alone decides who the caller is. The SHA-256 digest of the
//! `Authorization` header is the caller's scope for cached queries and
//! toasts.

use axum::{
  extract::FromRequestParts,
  http::{StatusCode, header, request::Parts},
};
use roster_core::CurrentUser;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::{
  AppState,
  backend::{Backend, BackendError, BackendRequest},
  error::Error,
  query::Query,
};

pub const CURRENT_USER_URL: &str = "/api/currentUser";

pub struct Session {
  pub user:          CurrentUser,
  pub scope:         String,
  pub authorization: String,
}

impl Session {
  /// Backend access on behalf of this caller.
  pub fn query<'a, B>(&'a self, state: &'a AppState<B>) -> Query<'a, B> {
    Query {
      backend:       &state.backend,
      cache:         &state.cache,
      scope:         &self.scope,
      authorization: &self.authorization,
    }
  }

  /// Admins only; everyone else gets 403.
  pub fn require_admin(&self) -> Result<(), Error> {
    if self.user.is_admin() {
      Ok(())
    } else {
      warn!(email = %self.user.email, "admin role required");
      Err(Error::Forbidden)
    }
  }
}

/// Hex SHA-256 of an `Authorization` header value.
pub fn scope_of(authorization: &str) -> String {
  hex::encode(Sha256::digest(authorization.as_bytes()))
}

impl<B: Backend> FromRequestParts<AppState<B>> for Session {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<B>,
  ) -> Result<Self, Self::Rejection> {
    let authorization = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(Error::Unauthorized)?
      .to_owned();

    let mut session = Session {
      user: CurrentUser::new(String::new(), false),
      scope: scope_of(&authorization),
      authorization,
    };

    let value = session
      .query(state)
      .fetch(&BackendRequest::get(CURRENT_USER_URL))
      .await
      .map_err(|e| match e.status() {
        Some(StatusCode::UNAUTHORIZED) => Error::Unauthorized,
        _ => Error::Backend(e),
      })?;
    session.user = serde_json::from_value(value)
      .map_err(|e| Error::Backend(BackendError::Decode(e.to_string())))?;
    Ok(session)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scope_is_stable_and_distinct() {
    let a = scope_of("Basic YTpi");
    assert_eq!(a, scope_of("Basic YTpi"));
    assert_ne!(a, scope_of("Basic YzpkCg=="));
    assert_eq!(a.len(), 64);
  }
}
