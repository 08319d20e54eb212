//! Server-rendered admin UI for Roster.
//!
//! Exposes an axum [`Router`] of HTML pages for the six resources. Pages talk
//! to the REST API through a [`Backend`], either a remote one over HTTP or the
//! API router mounted in the same process, and cache what they read in a
//! per-user [`QueryCache`].

pub mod backend;
pub mod error;
pub mod form;
pub mod html;
pub mod layout;
pub mod pages;
pub mod query;
pub mod session;
pub mod table;
pub mod toast;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use roster_api::UserAccount;
use roster_core::resources::{
  Article, DiningCommonsMenuItem, HelpRequest, MenuItemReview, Organization,
  RecommendationRequest,
};
use serde::Deserialize;

use backend::Backend;
use query::QueryCache;
use toast::Toaster;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Base URL of a remote API. Empty means the API is served in-process.
  #[serde(default)]
  pub backend_url:    String,
  /// How long a read is served without refetching. Zero refetches on every
  /// render and keeps the cache only as a fallback for failed reads.
  #[serde(default)]
  pub cache_ttl_secs: u64,
  #[serde(default)]
  pub users:          Vec<UserAccount>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page handlers.
pub struct AppState<B> {
  pub backend: Arc<B>,
  pub cache:   Arc<QueryCache>,
  pub toasts:  Arc<Toaster>,
}

impl<B> AppState<B> {
  pub fn new(backend: B, cache_ttl: Duration) -> Self {
    Self {
      backend: Arc::new(backend),
      cache:   Arc::new(QueryCache::new(cache_ttl)),
      toasts:  Arc::new(Toaster::new()),
    }
  }
}

impl<B> Clone for AppState<B> {
  fn clone(&self) -> Self {
    Self {
      backend: Arc::clone(&self.backend),
      cache:   Arc::clone(&self.cache),
      toasts:  Arc::clone(&self.toasts),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] serving the home page and every resource's pages.
pub fn router<B: Backend>(state: AppState<B>) -> Router {
  let router = Router::new().route("/", get(pages::home::<B>));
  let router = pages::routes::<B, Article>(router);
  let router = pages::routes::<B, HelpRequest>(router);
  let router = pages::routes::<B, MenuItemReview>(router);
  let router = pages::routes::<B, DiningCommonsMenuItem>(router);
  let router = pages::routes::<B, RecommendationRequest>(router);
  let router = pages::routes::<B, Organization>(router);
  router.with_state(state)
}
