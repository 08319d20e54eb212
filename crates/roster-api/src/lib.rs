//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::RecordStore`].
//! Requests authenticate with HTTP Basic against a [`UserDirectory`]; reads
//! require `ROLE_USER`, writes `ROLE_ADMIN`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(roster_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod records;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use roster_core::{
  CurrentUser,
  resources::{
    Article, DiningCommonsMenuItem, HelpRequest, MenuItemReview, Organization,
    RecommendationRequest,
  },
  store::RecordStore,
};

pub use auth::{UserAccount, UserDirectory};
pub use error::ApiError;

use auth::Authenticated;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub users: Arc<UserDirectory>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      users: Arc::clone(&self.users),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// Paths are absolute (`/api/...`), so the router is merged, not nested.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  let router = Router::new().route("/api/currentUser", get(current_user));
  let router = records::routes::<S, Article>(router);
  let router = records::routes::<S, HelpRequest>(router);
  let router = records::routes::<S, MenuItemReview>(router);
  let router = records::routes::<S, DiningCommonsMenuItem>(router);
  let router = records::routes::<S, RecommendationRequest>(router);
  let router = records::routes::<S, Organization>(router);
  router.with_state(state)
}

/// `GET /api/currentUser`
async fn current_user(Authenticated(user): Authenticated) -> Json<CurrentUser> {
  Json(user)
}
