//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing field: {0}")]
  MissingField(String),

  #[error("invalid value for {field}: {reason}")]
  InvalidField { field: String, reason: String },

  #[error("invalid {param}: {value:?}")]
  InvalidKey { param: &'static str, value: String },

  #[error("expected a JSON object")]
  NotAnObject,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
