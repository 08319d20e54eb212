//! Record keys.
//!
//! Five resources are keyed by a store-generated integer `id`; organizations
//! are keyed by the user-supplied `orgCode`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Fields, Result};

/// The identifying value of one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
  Id(i64),
  Code(String),
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Key::Id(id) => write!(f, "{id}"),
      Key::Code(code) => f.write_str(code),
    }
  }
}

impl From<i64> for Key {
  fn from(id: i64) -> Self { Key::Id(id) }
}

impl From<&str> for Key {
  fn from(code: &str) -> Self { Key::Code(code.to_owned()) }
}

/// How a resource is keyed.
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
  /// Query parameter and JSON field naming the key (`id`, `orgCode`).
  pub param:     &'static str,
  /// SQL primary-key column.
  pub column:    &'static str,
  /// `true` for store-generated surrogate keys; `false` for natural keys the
  /// user supplies on create.
  pub generated: bool,
}

impl KeySpec {
  /// Parse a key from its textual form (query parameter or path segment).
  pub fn parse(&self, raw: &str) -> Result<Key> {
    let invalid = || Error::InvalidKey {
      param: self.param,
      value: raw.to_owned(),
    };

    if self.generated {
      raw.trim().parse::<i64>().map(Key::Id).map_err(|_| invalid())
    } else if raw.is_empty() {
      Err(invalid())
    } else {
      Ok(Key::Code(raw.to_owned()))
    }
  }

  /// Read the key out of a record's JSON fields.
  pub fn from_record(&self, fields: &Fields) -> Option<Key> {
    match fields.get(self.param)? {
      Value::Number(n) if self.generated => n.as_i64().map(Key::Id),
      Value::String(s) if !self.generated => Some(Key::Code(s.clone())),
      _ => None,
    }
  }

  /// The key as the JSON value stored under [`KeySpec::param`].
  pub fn to_value(&self, key: &Key) -> Value {
    match key {
      Key::Id(id) => Value::from(*id),
      Key::Code(code) => Value::String(code.clone()),
    }
  }
}
