//! Field descriptors, validation rules and value coercion.
//!
//! Every value that crosses a boundary (query parameters, JSON bodies, HTML
//! form posts) arrives loosely typed. [`FieldKind::coerce`] turns it into the
//! canonical JSON representation the typed records deserialise from.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A record's fields as a JSON object keyed by wire (camelCase) name.
pub type Fields = Map<String, Value>;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// Scalar type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Email,
  Integer,
  Boolean,
  DateTime,
}

impl FieldKind {
  /// Coerce a loosely-typed JSON value into this kind's canonical form.
  ///
  /// Strings are accepted for every kind, since form inputs and query
  /// parameters are always text.
  pub fn coerce(self, field: &str, value: &Value) -> Result<Value> {
    let invalid = |reason: &str| Error::InvalidField {
      field:  field.to_owned(),
      reason: reason.to_owned(),
    };

    match (self, value) {
      (_, Value::Null) => Err(Error::MissingField(field.to_owned())),

      (Self::Text | Self::Email, Value::String(_)) => Ok(value.clone()),
      (Self::Text | Self::Email, Value::Number(n)) => {
        Ok(Value::String(n.to_string()))
      }
      (Self::Text | Self::Email, Value::Bool(b)) => {
        Ok(Value::String(b.to_string()))
      }

      (Self::Integer, Value::Number(n)) => n
        .as_i64()
        .map(Value::from)
        .ok_or_else(|| invalid("expected an integer")),
      (Self::Integer, Value::String(s)) => s
        .trim()
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| invalid("expected an integer")),

      (Self::Boolean, Value::Bool(_)) => Ok(value.clone()),
      (Self::Boolean, Value::String(s)) => parse_bool(s)
        .map(Value::Bool)
        .ok_or_else(|| invalid("expected a boolean")),

      (Self::DateTime, Value::String(s)) => {
        let dt = parse_datetime(s)
          .ok_or_else(|| invalid("expected an ISO-8601 local date-time"))?;
        Ok(serde_json::to_value(dt)?)
      }

      _ => Err(invalid("unexpected value type")),
    }
  }
}

/// Accepts the spellings HTML checkboxes and query strings commonly use.
pub fn parse_bool(raw: &str) -> Option<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "true" | "on" | "yes" | "1" => Some(true),
    "false" | "off" | "no" | "0" => Some(false),
    _ => None,
  }
}

const DATETIME_FORMATS: [&str; 3] =
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse `YYYY-MM-DDTHH:MM[:SS[.fff]]`.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
  let raw = raw.trim();
  DATETIME_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// A client-side validation rule and the message shown when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
  Required(&'static str),
  IsoDateTime(&'static str),
  MaxLength(usize, &'static str),
  Integer(&'static str),
}

impl Rule {
  /// Returns the rule's message if `raw` violates it.
  ///
  /// Format rules only apply to non-empty input; emptiness is the business of
  /// [`Rule::Required`].
  pub fn check(&self, raw: &str) -> Option<&'static str> {
    match *self {
      Rule::Required(msg) => raw.is_empty().then_some(msg),
      _ if raw.is_empty() => None,
      Rule::IsoDateTime(msg) => parse_datetime(raw).is_none().then_some(msg),
      Rule::MaxLength(max, msg) => (raw.chars().count() > max).then_some(msg),
      Rule::Integer(msg) => raw.trim().parse::<i64>().is_err().then_some(msg),
    }
  }
}

// ─── Specs ───────────────────────────────────────────────────────────────────

/// Static description of one field of a resource.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
  /// Wire name (JSON key, query parameter, form input name).
  pub name:   &'static str,
  /// SQL column name.
  pub column: &'static str,
  /// Human-readable label shown next to the input.
  pub label:  &'static str,
  pub kind:   FieldKind,
  pub rules:  &'static [Rule],
}

impl FieldSpec {
  /// First violated rule's message, in declaration order.
  pub fn violation(&self, raw: &str) -> Option<&'static str> {
    self.rules.iter().find_map(|rule| rule.check(raw))
  }

  pub fn is_required(&self) -> bool {
    self.rules.iter().any(|r| matches!(r, Rule::Required(_)))
  }
}

/// Coerce every field named in `specs` out of `source`.
///
/// Every spec'd field must be present; keys in `source` that no spec names
/// are dropped.
pub fn coerce_fields<'a>(
  specs: impl IntoIterator<Item = &'a FieldSpec>,
  source: &Fields,
) -> Result<Fields> {
  let mut out = Fields::new();
  for spec in specs {
    let value = source
      .get(spec.name)
      .ok_or_else(|| Error::MissingField(spec.name.to_owned()))?;
    out.insert(spec.name.to_owned(), spec.kind.coerce(spec.name, value)?);
  }
  Ok(out)
}

/// Render a canonical field value the way a text input displays it.
pub fn display_value(value: Option<&Value>) -> String {
  match value {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn integer_accepts_numeric_strings() {
    let v = FieldKind::Integer.coerce("stars", &json!(" 4 ")).unwrap();
    assert_eq!(v, json!(4));
  }

  #[test]
  fn integer_rejects_words() {
    let err = FieldKind::Integer.coerce("stars", &json!("four")).unwrap_err();
    assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "stars"));
  }

  #[test]
  fn boolean_accepts_checkbox_spellings() {
    let coerce = |raw: &str| FieldKind::Boolean.coerce("done", &json!(raw));
    assert_eq!(coerce("on").unwrap(), json!(true));
    assert_eq!(coerce("false").unwrap(), json!(false));
    assert!(coerce("maybe").is_err());
  }

  #[test]
  fn datetime_is_normalised_to_seconds() {
    let v = FieldKind::DateTime
      .coerce("requestTime", &json!("2022-01-02T12:00"))
      .unwrap();
    assert_eq!(v, json!("2022-01-02T12:00:00"));
  }

  #[test]
  fn datetime_keeps_fractional_seconds() {
    let v = FieldKind::DateTime
      .coerce("dateAdded", &json!("2020-11-11T11:11:11.5"))
      .unwrap();
    assert_eq!(v, json!("2020-11-11T11:11:11.500"));
  }

  #[test]
  fn null_is_missing() {
    let err = FieldKind::Text.coerce("title", &Value::Null).unwrap_err();
    assert!(matches!(err, Error::MissingField(ref f) if f == "title"));
  }

  #[test]
  fn format_rules_skip_empty_input() {
    assert_eq!(Rule::IsoDateTime("bad").check(""), None);
    assert_eq!(Rule::Integer("bad").check(""), None);
    assert_eq!(Rule::Required("req").check(""), Some("req"));
  }

  #[test]
  fn max_length_counts_characters() {
    let rule = Rule::MaxLength(3, "too long");
    assert_eq!(rule.check("äöü"), None);
    assert_eq!(rule.check("abcd"), Some("too long"));
  }

  #[test]
  fn coerce_fields_requires_every_spec() {
    const SPECS: &[FieldSpec] = &[FieldSpec {
      name:   "title",
      column: "title",
      label:  "Title",
      kind:   FieldKind::Text,
      rules:  &[],
    }];
    let err = coerce_fields(SPECS, &Fields::new()).unwrap_err();
    assert!(matches!(err, Error::MissingField(ref f) if f == "title"));
  }
}
