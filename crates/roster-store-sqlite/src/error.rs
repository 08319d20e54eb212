//! Error type for `roster-store-sqlite`.

use roster_core::store::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A field value did not have the shape its column expects.
  #[error("cannot store {field}: {reason}")]
  Encode { field: String, reason: String },

  /// Insert of a natural key that already exists.
  #[error("{0}")]
  Conflict(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl roster_core::store::StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Conflict(_) => ErrorKind::Conflict,
      Error::Core(_) | Error::Encode { .. } => ErrorKind::Invalid,
      Error::Database(_) => ErrorKind::Other,
    }
  }
}
