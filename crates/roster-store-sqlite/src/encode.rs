//! Encoding and decoding between canonical JSON field values and SQLite
//! column values.
//!
//! Booleans are stored as `0`/`1` integers. Date-times are stored as the
//! canonical ISO 8601 text produced by `roster_core::field`.

use rusqlite::types::Value as SqlValue;
use serde_json::Value;

use roster_core::{
  Fields, Key, ResourceDescriptor,
  field::{FieldKind, FieldSpec},
};

use crate::{Error, Result};

// ─── Fields → SQL ────────────────────────────────────────────────────────────

pub fn encode_field(spec: &FieldSpec, value: &Value) -> Result<SqlValue> {
  let mismatch = || Error::Encode {
    field:  spec.name.to_owned(),
    reason: format!("expected {:?}, got {value}", spec.kind),
  };

  match (spec.kind, value) {
    (FieldKind::Text | FieldKind::Email | FieldKind::DateTime, Value::String(s)) => {
      Ok(SqlValue::Text(s.clone()))
    }
    (FieldKind::Integer, Value::Number(n)) => {
      n.as_i64().map(SqlValue::Integer).ok_or_else(mismatch)
    }
    (FieldKind::Boolean, Value::Bool(b)) => Ok(SqlValue::Integer(i64::from(*b))),
    _ => Err(mismatch()),
  }
}

/// Encode the values of `specs`, in order, taken from `fields`.
pub fn encode_fields<'a>(
  specs: impl IntoIterator<Item = &'a FieldSpec>,
  fields: &Fields,
) -> Result<Vec<SqlValue>> {
  specs
    .into_iter()
    .map(|spec| {
      let value = fields
        .get(spec.name)
        .ok_or_else(|| roster_core::Error::MissingField(spec.name.to_owned()))?;
      encode_field(spec, value)
    })
    .collect()
}

pub fn encode_key(key: &Key) -> SqlValue {
  match key {
    Key::Id(id) => SqlValue::Integer(*id),
    Key::Code(code) => SqlValue::Text(code.clone()),
  }
}

// ─── SQL → Fields ────────────────────────────────────────────────────────────

fn decode_field(
  spec: &FieldSpec,
  row: &rusqlite::Row<'_>,
  idx: usize,
) -> rusqlite::Result<Value> {
  Ok(match spec.kind {
    FieldKind::Text | FieldKind::Email | FieldKind::DateTime => {
      Value::String(row.get(idx)?)
    }
    FieldKind::Integer => Value::from(row.get::<_, i64>(idx)?),
    FieldKind::Boolean => Value::Bool(row.get::<_, i64>(idx)? != 0),
  })
}

// ─── Row layout ──────────────────────────────────────────────────────────────

/// The SQL shape of one resource's table, derived from its descriptor.
///
/// Rows are read as `[surrogate key,] field columns...`: a surrogate key is
/// selected first, a natural key is already one of the fields.
#[derive(Clone, Copy)]
pub struct Layout {
  pub desc: &'static ResourceDescriptor,
}

impl Layout {
  pub fn new(desc: &'static ResourceDescriptor) -> Self { Self { desc } }

  fn columns(&self) -> String {
    let fields = self.desc.fields.iter().map(|f| f.column);
    if self.desc.key.generated {
      std::iter::once(self.desc.key.column)
        .chain(fields)
        .collect::<Vec<_>>()
        .join(", ")
    } else {
      fields.collect::<Vec<_>>().join(", ")
    }
  }

  pub fn select_all(&self) -> String {
    format!(
      "SELECT {} FROM {} ORDER BY {}",
      self.columns(),
      self.desc.table,
      self.desc.key.column
    )
  }

  pub fn select_one(&self) -> String {
    format!(
      "SELECT {} FROM {} WHERE {} = ?1",
      self.columns(),
      self.desc.table,
      self.desc.key.column
    )
  }

  /// `INSERT` of every create field, bound positionally.
  pub fn insert(&self) -> String {
    let columns: Vec<_> = self.desc.create_specs().map(|f| f.column).collect();
    let params: Vec<_> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
      "INSERT INTO {} ({}) VALUES ({})",
      self.desc.table,
      columns.join(", "),
      params.join(", ")
    )
  }

  /// `UPDATE` of every editable field; the key is bound last.
  pub fn update(&self) -> String {
    let sets: Vec<_> = self
      .desc
      .update_specs()
      .enumerate()
      .map(|(i, f)| format!("{} = ?{}", f.column, i + 1))
      .collect();
    format!(
      "UPDATE {} SET {} WHERE {} = ?{}",
      self.desc.table,
      sets.join(", "),
      self.desc.key.column,
      sets.len() + 1
    )
  }

  pub fn delete(&self) -> String {
    format!(
      "DELETE FROM {} WHERE {} = ?1",
      self.desc.table, self.desc.key.column
    )
  }

  pub fn read_row(&self, row: &rusqlite::Row<'_>) -> rusqlite::Result<Fields> {
    let mut fields = Fields::new();
    let mut idx = 0;
    if self.desc.key.generated {
      fields.insert(
        self.desc.key.param.to_owned(),
        Value::from(row.get::<_, i64>(0)?),
      );
      idx = 1;
    }
    for spec in self.desc.fields {
      fields.insert(spec.name.to_owned(), decode_field(spec, row, idx)?);
      idx += 1;
    }
    Ok(fields)
  }
}

#[cfg(test)]
mod tests {
  use roster_core::resources::{MENU_ITEM_REVIEW, ORGANIZATION};
  use serde_json::json;

  use super::*;

  #[test]
  fn surrogate_key_is_selected_first() {
    let sql = Layout::new(&MENU_ITEM_REVIEW).select_one();
    assert!(sql.starts_with("SELECT id, item_id, review_email"), "{sql}");
  }

  #[test]
  fn update_binds_key_after_fields() {
    let sql = Layout::new(&ORGANIZATION).update();
    assert_eq!(
      sql,
      "UPDATE ucsborganizations SET org_translation_short = ?1, \
       org_translation = ?2, inactive = ?3 WHERE org_code = ?4"
    );
  }

  #[test]
  fn booleans_become_integers() {
    let inactive = ORGANIZATION.field("inactive").unwrap();
    let v = encode_field(inactive, &json!(true)).unwrap();
    assert_eq!(v, SqlValue::Integer(1));
  }

  #[test]
  fn uncoerced_values_are_rejected() {
    let stars = MENU_ITEM_REVIEW.field("stars").unwrap();
    let err = encode_field(stars, &json!("5")).unwrap_err();
    assert!(matches!(err, Error::Encode { ref field, .. } if field == "stars"));
  }
}
