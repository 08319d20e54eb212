//! Talking to the REST backend.
//!
//! Pages describe each call as a [`BackendRequest`] and hand it to a
//! [`Backend`] together with the caller's `Authorization` header. Two
//! backends exist: [`HttpBackend`] for a remote API and [`RouterBackend`],
//! which drives an in-process API router without touching the network.

use std::{future::Future, time::Duration};

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tower::ServiceExt;

// ─── Request ─────────────────────────────────────────────────────────────────

/// One backend call: method, API path, query parameters and optional JSON
/// body.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
  pub method: Method,
  pub url:    String,
  pub params: Vec<(String, String)>,
  pub body:   Option<Value>,
}

impl BackendRequest {
  pub fn new(method: Method, url: impl Into<String>) -> Self {
    Self {
      method,
      url: url.into(),
      params: Vec::new(),
      body: None,
    }
  }

  pub fn get(url: impl Into<String>) -> Self { Self::new(Method::GET, url) }

  pub fn post(url: impl Into<String>) -> Self { Self::new(Method::POST, url) }

  pub fn put(url: impl Into<String>) -> Self { Self::new(Method::PUT, url) }

  pub fn delete(url: impl Into<String>) -> Self { Self::new(Method::DELETE, url) }

  pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.params.push((key.into(), value.into()));
    self
  }

  pub fn json(mut self, body: Value) -> Self {
    self.body = Some(body);
    self
  }

  /// The path with its percent-encoded query string.
  pub fn uri(&self) -> String {
    if self.params.is_empty() {
      return self.url.clone();
    }
    let query: Vec<String> = self
      .params
      .iter()
      .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
      .collect();
    format!("{}?{}", self.url, query.join("&"))
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
  /// The backend answered with a non-success status.
  #[error("{status}: {message}")]
  Status { status: StatusCode, message: String },

  #[error("transport error: {0}")]
  Transport(String),

  #[error("invalid response body: {0}")]
  Decode(String),
}

impl BackendError {
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      BackendError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// The backend accepted the request but its reply could not be read.
  pub fn write_applied(&self) -> bool { matches!(self, BackendError::Decode(_)) }
}

/// Turn a raw response into JSON, or into the backend's error message.
fn decode_response(status: StatusCode, bytes: &[u8]) -> Result<Value, BackendError> {
  if !status.is_success() {
    let message = serde_json::from_slice::<Value>(bytes)
      .ok()
      .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
      .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());
    return Err(BackendError::Status { status, message });
  }
  if bytes.is_empty() {
    return Ok(Value::Null);
  }
  serde_json::from_slice(bytes).map_err(|e| BackendError::Decode(e.to_string()))
}

// ─── Trait ───────────────────────────────────────────────────────────────────

pub trait Backend: Send + Sync + 'static {
  /// Send `request` with the caller's `Authorization` header value.
  fn send(
    &self,
    request: &BackendRequest,
    authorization: &str,
  ) -> impl Future<Output = Result<Value, BackendError>> + Send;
}

// ─── Remote ──────────────────────────────────────────────────────────────────

/// A backend reached over HTTP.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpBackend {
  client:   Client,
  base_url: String,
}

impl HttpBackend {
  pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| BackendError::Transport(e.to_string()))?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_owned(),
    })
  }
}

impl Backend for HttpBackend {
  async fn send(
    &self,
    request: &BackendRequest,
    authorization: &str,
  ) -> Result<Value, BackendError> {
    let mut req = self
      .client
      .request(request.method.clone(), format!("{}{}", self.base_url, request.url))
      .query(&request.params)
      .header(header::AUTHORIZATION, authorization);
    if let Some(body) = &request.body {
      req = req.json(body);
    }

    let resp = req
      .send()
      .await
      .map_err(|e| BackendError::Transport(e.to_string()))?;
    let status = resp.status();
    let bytes = resp
      .bytes()
      .await
      .map_err(|e| BackendError::Transport(e.to_string()))?;
    decode_response(status, &bytes)
  }
}

// ─── In-process ──────────────────────────────────────────────────────────────

/// A backend served by an axum router in the same process.
#[derive(Clone)]
pub struct RouterBackend {
  router: Router,
}

impl RouterBackend {
  pub fn new(router: Router) -> Self { Self { router } }
}

impl Backend for RouterBackend {
  async fn send(
    &self,
    request: &BackendRequest,
    authorization: &str,
  ) -> Result<Value, BackendError> {
    let mut builder = Request::builder()
      .method(request.method.clone())
      .uri(request.uri())
      .header(header::AUTHORIZATION, authorization);
    let body = match &request.body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let req = builder
      .body(body)
      .map_err(|e| BackendError::Transport(e.to_string()))?;

    let resp = match self.router.clone().oneshot(req).await {
      Ok(resp) => resp,
      Err(never) => match never {},
    };
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .map_err(|e| BackendError::Transport(e.to_string()))?;
    decode_response(status, &bytes)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uri_encodes_parameters() {
    let req = BackendRequest::post("/api/articles/post")
      .param("title", "Rust & you")
      .param("email", "a@ucsb.edu");
    assert_eq!(
      req.uri(),
      "/api/articles/post?title=Rust%20%26%20you&email=a%40ucsb.edu"
    );
    assert_eq!(BackendRequest::get("/api/articles/all").uri(), "/api/articles/all");
  }

  #[test]
  fn error_bodies_yield_backend_message() {
    let err = decode_response(
      StatusCode::NOT_FOUND,
      br#"{"type":"EntityNotFoundException","message":"Article with id 7 not found"}"#,
    )
    .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "404 Not Found: Article with id 7 not found");
  }
}
