//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `roster-store-sqlite`). The REST
//! layer depends on this abstraction, not on any concrete backend. Every
//! method is generic over the [`Resource`] it operates on; the resource's
//! descriptor supplies the table, key and field layout.

use std::future::Future;

use crate::{Fields, Key, Resource};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Coarse classification of a store failure, for mapping onto HTTP statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A natural key is already taken.
  Conflict,
  /// The supplied fields were missing or ill-typed.
  Invalid,
  Other,
}

pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a record store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  /// Every record of `R`, in key order.
  fn list<R: Resource>(
    &self,
  ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send + '_;

  /// Retrieve one record. Returns `None` if not found.
  fn get<R: Resource>(
    &self,
    key: Key,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send + '_;

  /// Persist a new record from coerced create fields.
  ///
  /// Surrogate keys are assigned by the store. Returns an error if a natural
  /// key is already taken.
  fn create<R: Resource>(
    &self,
    fields: Fields,
  ) -> impl Future<Output = Result<R, Self::Error>> + Send + '_;

  /// Overwrite the editable fields of an existing record. The key itself is
  /// never changed. Returns `None` if not found.
  fn update<R: Resource>(
    &self,
    key: Key,
    fields: Fields,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send + '_;

  /// Hard-delete one record. Returns `false` if not found.
  fn delete<R: Resource>(
    &self,
    key: Key,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
