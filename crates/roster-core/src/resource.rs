//! The generic CRUD template.
//!
//! A [`ResourceDescriptor`] is the static description of one resource: its
//! fields and their validation rules, its key, the backend and UI paths, and
//! the columns its table shows. Every layer above this crate (store, REST
//! API, HTML pages) is written once against the descriptor and instantiated
//! per resource through the [`Resource`] trait.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
  Error, Fields, Key, Result,
  field::{FieldSpec, coerce_fields},
  key::KeySpec,
};

/// One column of a resource's index table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
  pub header: &'static str,
  /// Wire name of the field shown in the column.
  pub field:  &'static str,
}

#[derive(Debug)]
pub struct ResourceDescriptor {
  /// Entity name used in backend messages (`{entity} with id 7 not found`).
  pub entity:         &'static str,
  /// SQL table.
  pub table:          &'static str,
  /// Backend base path, e.g. `/api/articles`.
  pub api_base:       &'static str,
  /// UI base path, e.g. `/articles`.
  pub route:          &'static str,
  /// Heading of the index page and label of its home-page link.
  pub title:          &'static str,
  pub form_test_id:   &'static str,
  pub table_test_id:  &'static str,
  pub create_heading: &'static str,
  pub edit_heading:   &'static str,
  /// Label of the index page's "Create" link.
  pub create_button:  &'static str,
  pub key:            KeySpec,
  /// Every non-surrogate field, in form order. A natural key is listed here
  /// like any other field.
  pub fields:         &'static [FieldSpec],
  pub columns:        &'static [ColumnSpec],
}

impl ResourceDescriptor {
  pub fn field(&self, name: &str) -> Option<&FieldSpec> {
    self.fields.iter().find(|f| f.name == name)
  }

  /// Fields supplied on create: all of them, natural key included.
  pub fn create_specs(&self) -> impl Iterator<Item = &FieldSpec> {
    self.fields.iter()
  }

  /// Fields an update may change: everything except the key.
  pub fn update_specs(&self) -> impl Iterator<Item = &FieldSpec> {
    self.fields.iter().filter(|f| f.name != self.key.param)
  }

  /// Coerce the inputs of a create request. A natural key must be one that
  /// [`KeySpec::parse`] accepts, or the record could never be addressed.
  pub fn create_fields(&self, source: &Fields) -> Result<Fields> {
    let fields = coerce_fields(self.create_specs(), source)?;
    if !self.key.generated {
      let raw = fields
        .get(self.key.param)
        .and_then(Value::as_str)
        .unwrap_or_default();
      self.key.parse(raw)?;
    }
    Ok(fields)
  }

  /// Coerce the JSON body of an update request. A key present in the body is
  /// ignored.
  pub fn update_fields(&self, body: &Value) -> Result<Fields> {
    let source = body.as_object().ok_or(Error::NotAnObject)?;
    coerce_fields(self.update_specs(), source)
  }

  // ── Backend paths ─────────────────────────────────────────────────────

  pub fn collection_url(&self) -> String { format!("{}/all", self.api_base) }

  pub fn create_url(&self) -> String { format!("{}/post", self.api_base) }

  // ── UI paths ──────────────────────────────────────────────────────────

  pub fn create_route(&self) -> String { format!("{}/create", self.route) }

  pub fn edit_route(&self, key: &Key) -> String {
    format!("{}/edit/{}", self.route, urlencoding::encode(&key.to_string()))
  }

  pub fn delete_route(&self, key: &Key) -> String {
    format!("{}/delete/{}", self.route, urlencoding::encode(&key.to_string()))
  }

  // ── Messages ──────────────────────────────────────────────────────────

  pub fn not_found_message(&self, key: &Key) -> String {
    format!("{} with id {key} not found", self.entity)
  }

  pub fn deleted_message(&self, key: &Key) -> String {
    format!("{} with id {key} deleted", self.entity)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A typed record of one resource.
///
/// The record's serde representation (camelCase wire names) must agree with
/// the descriptor's field names.
pub trait Resource:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  fn descriptor() -> &'static ResourceDescriptor;

  fn key(&self) -> Key;

  /// Toast shown after a successful create.
  fn created_message(&self) -> String;

  /// Toast shown after a successful update.
  fn updated_message(&self) -> String;

  /// The record as a JSON object keyed by wire name.
  fn to_fields(&self) -> Result<Fields> {
    match serde_json::to_value(self)? {
      Value::Object(map) => Ok(map),
      _ => Err(Error::NotAnObject),
    }
  }

  fn from_fields(fields: Fields) -> Result<Self> {
    Ok(serde_json::from_value(Value::Object(fields))?)
  }
}
