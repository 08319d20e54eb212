//! Core types and trait definitions for Roster.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the resource descriptors that drive every CRUD pipeline, the typed records
//! for each resource, and the [`store::RecordStore`] abstraction that storage
//! backends implement.

// Native `async fn` in traits; the `Send` bounds are spelled out on the trait
// methods that need them.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod field;
pub mod key;
pub mod resource;
pub mod resources;
pub mod store;
pub mod user;

pub use error::{Error, Result};
pub use field::Fields;
pub use key::Key;
pub use resource::{Resource, ResourceDescriptor};
pub use user::{CurrentUser, Role};
