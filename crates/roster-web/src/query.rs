//! Cached backend reads and invalidating mutations.
//!
//! Every read is identified by a [`QueryKey`], the signature of the request
//! that produced it (e.g. `["/api/articles/all"]`). Entries are partitioned by
//! scope, a digest of the caller's credentials, so users never see each
//! other's data. A mutation names the keys it invalidates and those keys are
//! dropped for every scope; nothing else is evicted and nothing is rolled
//! back on failure.

use std::{
  collections::HashMap,
  sync::Mutex,
  time::{Duration, Instant},
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::backend::{Backend, BackendError, BackendRequest};

// ─── Keys ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
  pub fn new<I, S>(parts: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(parts.into_iter().map(Into::into).collect())
  }

  /// The key a GET of `request` is cached under.
  pub fn of(request: &BackendRequest) -> Self { Self(vec![request.uri()]) }
}

// ─── Cache ───────────────────────────────────────────────────────────────────

struct Entry {
  value:      Value,
  fetched_at: Instant,
}

/// Response cache with a freshness window, keyed by query then by scope.
pub struct QueryCache {
  ttl:     Duration,
  entries: Mutex<HashMap<QueryKey, HashMap<String, Entry>>>,
}

impl QueryCache {
  pub fn new(ttl: Duration) -> Self {
    Self {
      ttl,
      entries: Mutex::new(HashMap::new()),
    }
  }

  fn lookup(&self, scope: &str, key: &QueryKey, fresh_only: bool) -> Option<Value> {
    let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
    let entry = entries.get(key)?.get(scope)?;
    if fresh_only && entry.fetched_at.elapsed() >= self.ttl {
      return None;
    }
    Some(entry.value.clone())
  }

  /// The cached value if it is still within the TTL.
  pub fn fresh(&self, scope: &str, key: &QueryKey) -> Option<Value> {
    self.lookup(scope, key, true)
  }

  /// The cached value regardless of age.
  pub fn stale(&self, scope: &str, key: &QueryKey) -> Option<Value> {
    self.lookup(scope, key, false)
  }

  pub fn put(&self, scope: &str, key: QueryKey, value: Value) {
    let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
    entries.entry(key).or_default().insert(scope.to_owned(), Entry {
      value,
      fetched_at: Instant::now(),
    });
  }

  /// Drop `keys` for every scope.
  pub fn invalidate(&self, keys: &[QueryKey]) {
    let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
    for key in keys {
      if let Some(scopes) = entries.remove(key) {
        debug!(?key, scopes = scopes.len(), "invalidated");
      }
    }
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// A caller's view of the backend: one scope, one set of credentials.
pub struct Query<'a, B> {
  pub backend:       &'a B,
  pub cache:         &'a QueryCache,
  pub scope:         &'a str,
  pub authorization: &'a str,
}

fn log_failure(request: &BackendRequest, err: &BackendError) {
  error!(
    error = %err,
    "Error communicating with backend via {} on {}",
    request.method,
    request.url
  );
}

fn decode<T: DeserializeOwned>(
  request: &BackendRequest,
  value: Value,
) -> Option<T> {
  serde_json::from_value(value)
    .inspect_err(|e| {
      error!(error = %e, url = %request.url, "unexpected response shape");
    })
    .ok()
}

impl<B: Backend> Query<'_, B> {
  /// Fetch through the cache, propagating failures.
  pub async fn fetch(&self, request: &BackendRequest) -> Result<Value, BackendError> {
    let key = QueryKey::of(request);
    if let Some(value) = self.cache.fresh(self.scope, &key) {
      debug!(?key, "cache hit");
      return Ok(value);
    }
    let value = self.backend.send(request, self.authorization).await?;
    self.cache.put(self.scope, key, value.clone());
    Ok(value)
  }

  /// Fetch through the cache; on failure log and fall back to the stale
  /// value, else `default`.
  pub async fn fetch_or<T: DeserializeOwned>(
    &self,
    request: &BackendRequest,
    default: T,
  ) -> T {
    let value = match self.fetch(request).await {
      Ok(value) => value,
      Err(err) => {
        log_failure(request, &err);
        match self.cache.stale(self.scope, &QueryKey::of(request)) {
          Some(stale) => stale,
          None => return default,
        }
      }
    };
    decode(request, value).unwrap_or(default)
  }

  /// Fetch through the cache; on failure log and return `None`. Stale
  /// entries are never served.
  pub async fn fetch_current<T: DeserializeOwned>(
    &self,
    request: &BackendRequest,
  ) -> Option<T> {
    match self.fetch(request).await {
      Ok(value) => decode(request, value),
      Err(err) => {
        log_failure(request, &err);
        None
      }
    }
  }

  /// Send a mutation; once the backend has applied it, invalidate exactly
  /// `invalidates`.
  pub async fn mutate<T: DeserializeOwned>(
    &self,
    request: &BackendRequest,
    invalidates: &[QueryKey],
  ) -> Result<T, BackendError> {
    let result = self
      .backend
      .send(request, self.authorization)
      .await
      .and_then(|value| {
        serde_json::from_value(value)
          .map_err(|e| BackendError::Decode(e.to_string()))
      });
    match &result {
      Ok(_) => self.cache.invalidate(invalidates),
      Err(err) if err.write_applied() => {
        warn!(
          error = %err,
          "Backend applied {} on {} but its reply was unreadable",
          request.method,
          request.url
        );
        self.cache.invalidate(invalidates);
      }
      Err(err) => log_failure(request, err),
    }
    result
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  };

  use axum::http::StatusCode;
  use serde_json::json;

  use super::*;

  /// Answers every request with a counter value, or fails when told to.
  #[derive(Default)]
  struct Counting {
    calls:   AtomicUsize,
    failing: AtomicBool,
  }

  impl Backend for Arc<Counting> {
    async fn send(
      &self,
      _request: &BackendRequest,
      _authorization: &str,
    ) -> Result<Value, BackendError> {
      let n = self.calls.fetch_add(1, Ordering::SeqCst);
      if self.failing.load(Ordering::SeqCst) {
        return Err(BackendError::Status {
          status:  StatusCode::INTERNAL_SERVER_ERROR,
          message: "down".into(),
        });
      }
      Ok(json!([n]))
    }
  }

  fn query<'a>(
    backend: &'a Arc<Counting>,
    cache: &'a QueryCache,
  ) -> Query<'a, Arc<Counting>> {
    Query { backend, cache, scope: "scope", authorization: "Basic x" }
  }

  #[tokio::test]
  async fn fresh_entries_are_served_from_cache() {
    let backend = Arc::new(Counting::default());
    let cache = QueryCache::new(Duration::from_secs(60));
    let q = query(&backend, &cache);
    let req = BackendRequest::get("/api/articles/all");

    let first: Vec<usize> = q.fetch_or(&req, vec![]).await;
    let second: Vec<usize> = q.fetch_or(&req, vec![]).await;
    assert_eq!(first, vec![0]);
    assert_eq!(second, vec![0]);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn mutation_invalidates_listed_keys_only() {
    let backend = Arc::new(Counting::default());
    let cache = QueryCache::new(Duration::from_secs(60));
    let q = query(&backend, &cache);
    let all = BackendRequest::get("/api/articles/all");
    let other = BackendRequest::get("/api/helprequest/all");

    let _: Vec<usize> = q.fetch_or(&all, vec![]).await;
    let _: Vec<usize> = q.fetch_or(&other, vec![]).await;
    let _: Value = q
      .mutate(&BackendRequest::post("/api/articles/post"), &[QueryKey::of(&all)])
      .await
      .unwrap();

    assert!(cache.fresh("scope", &QueryKey::of(&all)).is_none());
    assert!(cache.fresh("scope", &QueryKey::of(&other)).is_some());
  }

  #[tokio::test]
  async fn failure_falls_back_to_stale_then_default() {
    let backend = Arc::new(Counting::default());
    let cache = QueryCache::new(Duration::ZERO);
    let q = query(&backend, &cache);
    let req = BackendRequest::get("/api/articles/all");

    let fetched: Vec<usize> = q.fetch_or(&req, vec![]).await;
    assert_eq!(fetched, vec![0]);

    backend.failing.store(true, Ordering::SeqCst);
    let stale: Vec<usize> = q.fetch_or(&req, vec![]).await;
    assert_eq!(stale, vec![0]);

    let other = BackendRequest::get("/api/helprequest/all");
    let fallback: Vec<usize> = q.fetch_or(&other, vec![42]).await;
    assert_eq!(fallback, vec![42]);
  }

  #[tokio::test]
  async fn failed_mutation_keeps_cache() {
    let backend = Arc::new(Counting::default());
    let cache = QueryCache::new(Duration::from_secs(60));
    let q = query(&backend, &cache);
    let all = BackendRequest::get("/api/articles/all");
    let _: Vec<usize> = q.fetch_or(&all, vec![]).await;

    backend.failing.store(true, Ordering::SeqCst);
    let result: Result<Value, _> = q
      .mutate(&BackendRequest::delete("/api/articles"), &[QueryKey::of(&all)])
      .await;
    assert!(result.is_err());
    assert!(cache.fresh("scope", &QueryKey::of(&all)).is_some());
  }

  #[tokio::test]
  async fn current_fetch_never_serves_stale() {
    let backend = Arc::new(Counting::default());
    let cache = QueryCache::new(Duration::ZERO);
    let q = query(&backend, &cache);
    let req = BackendRequest::get("/api/articles?id=1");

    let fetched: Option<Vec<usize>> = q.fetch_current(&req).await;
    assert_eq!(fetched, Some(vec![0]));

    backend.failing.store(true, Ordering::SeqCst);
    let current: Option<Vec<usize>> = q.fetch_current(&req).await;
    assert_eq!(current, None);
  }

  #[test]
  fn invalidation_reaches_every_scope() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let key = QueryKey::new(["/api/articles/all"]);
    let other = QueryKey::new(["/api/helprequest/all"]);
    cache.put("alice", key.clone(), json!([1]));
    cache.put("bob", key.clone(), json!([1]));
    cache.put("bob", other.clone(), json!([2]));

    cache.invalidate(std::slice::from_ref(&key));
    assert!(cache.stale("alice", &key).is_none());
    assert!(cache.stale("bob", &key).is_none());
    assert_eq!(cache.fresh("bob", &other), Some(json!([2])));
  }

  #[test]
  fn scopes_are_isolated() {
    let cache = QueryCache::new(Duration::from_secs(60));
    let key = QueryKey::new(["/api/articles/all"]);
    cache.put("alice", key.clone(), json!([1]));
    assert!(cache.fresh("bob", &key).is_none());
    assert_eq!(cache.fresh("alice", &key), Some(json!([1])));
  }
}
