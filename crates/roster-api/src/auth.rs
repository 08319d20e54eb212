//! HTTP Basic-auth extractors and the configured user directory.
//!
//! Every configured account holds `ROLE_USER`; accounts flagged `admin` also
//! hold `ROLE_ADMIN`. [`Authenticated`] admits any signed-in user, [`Admin`]
//! additionally rejects non-admins with 403.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rand_core::OsRng;
use roster_core::{CurrentUser, Role, store::RecordStore};
use serde::Deserialize;
use tracing::warn;

use crate::{ApiState, error::ApiError};

// ─── Accounts ────────────────────────────────────────────────────────────────

/// One configured login.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccount {
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  #[serde(default)]
  pub admin:         bool,
}

/// The accounts allowed to sign in.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
  accounts: Vec<UserAccount>,
}

impl UserDirectory {
  pub fn new(accounts: Vec<UserAccount>) -> Self { Self { accounts } }

  /// Verify the `Authorization` header and resolve the caller.
  pub fn authenticate(&self, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let header_val = headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;

    let encoded = header_val
      .strip_prefix("Basic ")
      .ok_or(ApiError::Unauthorized)?;

    let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
    let creds = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

    let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

    let account = self
      .accounts
      .iter()
      .find(|a| a.email == email)
      .ok_or_else(|| {
        warn!(%email, "unknown account");
        ApiError::Unauthorized
      })?;

    let parsed_hash =
      PasswordHash::new(&account.password_hash).map_err(|_| ApiError::Unauthorized)?;

    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| {
        warn!(%email, "password rejected");
        ApiError::Unauthorized
      })?;

    Ok(CurrentUser::new(account.email.clone(), account.admin))
  }
}

/// Produce an argon2 PHC string for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// Any signed-in user (`ROLE_USER`).
pub struct Authenticated(pub CurrentUser);

/// A signed-in user holding `ROLE_ADMIN`.
pub struct Admin(pub CurrentUser);

impl<S: RecordStore> FromRequestParts<ApiState<S>> for Authenticated {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = state.users.authenticate(&parts.headers)?;
    if !user.has_role(Role::User) {
      return Err(ApiError::Forbidden);
    }
    Ok(Authenticated(user))
  }
}

impl<S: RecordStore> FromRequestParts<ApiState<S>> for Admin {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Authenticated(user) = Authenticated::from_request_parts(parts, state).await?;
    if !user.is_admin() {
      warn!(email = %user.email, path = %parts.uri.path(), "admin role required");
      return Err(ApiError::Forbidden);
    }
    Ok(Admin(user))
  }
}
