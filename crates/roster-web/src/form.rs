//! The create/edit form shared by every resource.
//!
//! Values travel as strings, exactly as the browser posts them. Validation
//! runs against the descriptor's rules on every submission and reports every
//! violated field at once; nothing reaches the backend until the whole form
//! is valid.

use std::collections::BTreeMap;

use roster_core::{
  Key, ResourceDescriptor,
  field::{FieldKind, FieldSpec, display_value, parse_bool},
};
use serde_json::Value;

use crate::html::Html;

pub type Values = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Create,
  Edit(Key),
}

/// What the form shows: current values and, after a submission attempt, the
/// per-field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
  pub values:    Values,
  pub errors:    BTreeMap<String, &'static str>,
  pub submitted: bool,
}

impl FormState {
  /// An empty create form. Checkboxes start unchecked.
  pub fn blank(desc: &ResourceDescriptor) -> Self {
    let values = desc
      .fields
      .iter()
      .filter(|f| f.kind == FieldKind::Boolean)
      .map(|f| (f.name.to_owned(), "false".to_owned()))
      .collect();
    Self { values, ..Self::default() }
  }

  /// An edit form pre-filled from a fetched record, key included.
  pub fn from_record(desc: &ResourceDescriptor, record: &Value) -> Self {
    let mut values = Values::new();
    values.insert(desc.key.param.to_owned(), display_value(record.get(desc.key.param)));
    for spec in desc.fields {
      values.insert(spec.name.to_owned(), display_value(record.get(spec.name)));
    }
    Self { values, ..Self::default() }
  }
}

/// The outcome of a submission.
#[derive(Debug)]
pub enum Submission<T> {
  Accepted(T),
  Rejected(FormState),
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Reduce a posted form to one string per field. Checkboxes are absent from
/// the post when unchecked, so every boolean field becomes `"true"` or
/// `"false"`.
pub fn normalise(desc: &ResourceDescriptor, mode: &Mode, raw: &Values) -> Values {
  let mut values = Values::new();
  for spec in desc.fields {
    let value = match spec.kind {
      FieldKind::Boolean => raw
        .get(spec.name)
        .and_then(|v| parse_bool(v))
        .unwrap_or(false)
        .to_string(),
      _ => raw.get(spec.name).cloned().unwrap_or_default(),
    };
    values.insert(spec.name.to_owned(), value);
  }
  // Disabled inputs are not posted; the key comes from the path.
  if let Mode::Edit(key) = mode {
    values.insert(desc.key.param.to_owned(), key.to_string());
  }
  values
}

/// Every violated field and its message.
pub fn validate(
  desc: &ResourceDescriptor,
  values: &Values,
) -> BTreeMap<String, &'static str> {
  desc
    .fields
    .iter()
    .filter_map(|spec| {
      let raw = values.get(spec.name).map(String::as_str).unwrap_or("");
      spec.violation(raw).map(|msg| (spec.name.to_owned(), msg))
    })
    .collect()
}

/// Validate a posted form and hand the values to `on_valid` only if every
/// rule passes.
pub fn submit<T>(
  desc: &ResourceDescriptor,
  mode: &Mode,
  raw: &Values,
  on_valid: impl FnOnce(&Values) -> T,
) -> Submission<T> {
  let values = normalise(desc, mode, raw);
  let errors = validate(desc, &values);
  if errors.is_empty() {
    Submission::Accepted(on_valid(&values))
  } else {
    Submission::Rejected(FormState { values, errors, submitted: true })
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn input_type(kind: FieldKind) -> &'static str {
  match kind {
    FieldKind::Email => "email",
    FieldKind::DateTime => "datetime-local",
    FieldKind::Boolean => "checkbox",
    FieldKind::Text | FieldKind::Integer => "text",
  }
}

fn render_field(
  html: &mut Html,
  desc: &ResourceDescriptor,
  spec: &FieldSpec,
  state: &FormState,
  disabled: bool,
) {
  let test_id = format!("{}-{}", desc.form_test_id, spec.name);
  let value = state.values.get(spec.name).map(String::as_str).unwrap_or("");
  let error = state.submitted.then(|| state.errors.get(spec.name)).flatten();

  html.open("div", &[("class", "mb-3")]);
  html.elem("label", &[("for", spec.name), ("class", "form-label")], spec.label);

  let class = match (spec.kind, error) {
    (FieldKind::Boolean, _) => "form-check-input",
    (_, Some(_)) => "form-control is-invalid",
    (_, None) => "form-control",
  };
  let mut attrs = vec![
    ("data-testid", test_id.as_str()),
    ("id", spec.name),
    ("name", spec.name),
    ("type", input_type(spec.kind)),
    ("class", class),
  ];
  if spec.kind == FieldKind::Boolean {
    attrs.push(("value", "true"));
    if parse_bool(value).unwrap_or(false) {
      attrs.push(("checked", "checked"));
    }
  } else {
    attrs.push(("value", value));
  }
  if disabled {
    attrs.push(("disabled", "disabled"));
  }
  html.void("input", &attrs);

  if let Some(msg) = error {
    let error_id = format!("{test_id}-error");
    html.elem(
      "div",
      &[("class", "invalid-feedback"), ("data-testid", &error_id)],
      msg,
    );
  }
  html.close("div");
}

/// Render the form. `cancel` is where the Cancel link leads.
pub fn render_form(
  html: &mut Html,
  desc: &ResourceDescriptor,
  mode: &Mode,
  state: &FormState,
  cancel: &str,
) {
  let (action, button) = match mode {
    Mode::Create => (desc.create_route(), "Create"),
    Mode::Edit(key) => (desc.edit_route(key), "Update"),
  };
  html.open("form", &[("method", "post"), ("action", &action)]);

  if let (Mode::Edit(key), true) = (mode, desc.key.generated) {
    let test_id = format!("{}-id", desc.form_test_id);
    let key = key.to_string();
    html
      .open("div", &[("class", "mb-3")])
      .elem("label", &[("for", "id"), ("class", "form-label")], "Id")
      .void("input", &[
        ("data-testid", &test_id),
        ("id", "id"),
        ("type", "text"),
        ("class", "form-control"),
        ("value", &key),
        ("disabled", "disabled"),
      ])
      .close("div");
  }

  for spec in desc.fields {
    let natural_key = !desc.key.generated && spec.name == desc.key.param;
    let disabled = natural_key && matches!(mode, Mode::Edit(_));
    render_field(html, desc, spec, state, disabled);
  }

  let submit_id = format!("{}-submit", desc.form_test_id);
  let cancel_id = format!("{}-cancel", desc.form_test_id);
  html
    .elem(
      "button",
      &[
        ("type", "submit"),
        ("class", "btn btn-primary"),
        ("data-testid", &submit_id),
      ],
      button,
    )
    .elem(
      "a",
      &[
        ("href", cancel),
        ("class", "btn btn-secondary"),
        ("data-testid", &cancel_id),
      ],
      "Cancel",
    )
    .close("form");
}

#[cfg(test)]
mod tests {
  use roster_core::resources::{ARTICLE, MENU_ITEM_REVIEW, ORGANIZATION};
  use serde_json::json;

  use super::*;

  fn values(pairs: &[(&str, &str)]) -> Values {
    pairs
      .iter()
      .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
      .collect()
  }

  fn render(mode: &Mode, state: &FormState) -> String {
    let mut html = Html::new();
    render_form(&mut html, &ARTICLE, mode, state, "/articles");
    html.finish().unwrap()
  }

  #[test]
  fn empty_submission_reports_every_required_field() {
    let mut called = false;
    let outcome = submit(&ARTICLE, &Mode::Create, &Values::new(), |_| called = true);
    assert!(!called);

    let Submission::Rejected(state) = outcome else { panic!("accepted") };
    assert_eq!(state.errors.len(), 5);
    assert_eq!(state.errors["title"], "Title is required.");
    assert_eq!(state.errors["dateAdded"], "Date added is required.");

    let out = render(&Mode::Create, &state);
    assert!(out.contains("Explanation is required."));
    assert!(out.contains("data-testid=\"ArticleForm-email-error\""));
  }

  #[test]
  fn valid_submission_invokes_callback_once() {
    let raw = values(&[
      ("title", "Rust"),
      ("url", "https://rust-lang.org"),
      ("explanation", "home"),
      ("email", "a@ucsb.edu"),
      ("dateAdded", "2022-01-02T12:00"),
    ]);
    let mut calls = 0;
    let outcome = submit(&ARTICLE, &Mode::Create, &raw, |v| {
      calls += 1;
      v.clone()
    });
    let Submission::Accepted(sent) = outcome else { panic!("rejected") };
    assert_eq!(calls, 1);
    assert_eq!(sent, raw);
  }

  #[test]
  fn format_rules_apply_to_non_empty_values() {
    let raw = values(&[
      ("itemId", "twenty"),
      ("reviewEmail", "a@ucsb.edu"),
      ("stars", "3"),
      ("dateReviewed", "yesterday"),
      ("comments", "ok"),
    ]);
    let submission = submit(&MENU_ITEM_REVIEW, &Mode::Create, &raw, |_| ());
    let Submission::Rejected(state) = submission else {
      panic!("accepted")
    };
    assert_eq!(state.errors.len(), 2);
    assert!(state.errors.contains_key("itemId"));
    assert!(state.errors.contains_key("dateReviewed"));
  }

  #[test]
  fn errors_stay_hidden_before_submission() {
    let out = render(&Mode::Create, &FormState::blank(&ARTICLE));
    assert!(!out.contains("is required"));
    assert!(!out.contains("ArticleForm-id"));
    assert!(out.contains("data-testid=\"ArticleForm-submit\">Create</button>"));
    assert!(out.contains("href=\"/articles\""));
    assert!(out.contains("data-testid=\"ArticleForm-cancel\""));
  }

  #[test]
  fn edit_prefills_every_field_and_disables_id() {
    let record = json!({
      "id": 17, "title": "Rust", "url": "https://rust-lang.org",
      "explanation": "home", "email": "a@ucsb.edu",
      "dateAdded": "2022-01-02T12:00:00"
    });
    let state = FormState::from_record(&ARTICLE, &record);
    let out = render(&Mode::Edit(Key::Id(17)), &state);

    assert!(out.contains("data-testid=\"ArticleForm-id\""));
    assert!(out.contains("value=\"17\" disabled=\"disabled\""));
    assert!(out.contains("value=\"2022-01-02T12:00:00\""));
    assert!(out.contains("value=\"https://rust-lang.org\""));
    assert!(out.contains(">Update</button>"));
    assert!(out.contains("action=\"/articles/edit/17\""));
  }

  #[test]
  fn natural_key_is_editable_on_create_only() {
    let mut html = Html::new();
    let blank = FormState::blank(&ORGANIZATION);
    render_form(&mut html, &ORGANIZATION, &Mode::Create, &blank, "/");
    let create = html.finish().unwrap();
    assert!(!create.contains("disabled"));

    let record = json!({
      "orgCode": "ZPR", "orgTranslationShort": "ZETA PHI RHO",
      "orgTranslation": "ZETA PHI RHO", "inactive": true
    });
    let mut html = Html::new();
    render_form(
      &mut html,
      &ORGANIZATION,
      &Mode::Edit(Key::from("ZPR")),
      &FormState::from_record(&ORGANIZATION, &record),
      "/",
    );
    let edit = html.finish().unwrap();
    assert!(edit.contains("value=\"ZPR\" disabled=\"disabled\""));
    assert!(edit.contains("checked=\"checked\""));
    assert!(!edit.contains("UCSBOrganizationForm-id\""));
  }

  #[test]
  fn checkboxes_normalise_and_key_comes_from_path() {
    let raw = values(&[
      ("orgTranslationShort", "Zeta"),
      ("orgTranslation", "Zeta Phi Rho"),
    ]);
    let mode = Mode::Edit(Key::from("ZPR"));
    let submission = submit(&ORGANIZATION, &mode, &raw, Values::clone);
    let Submission::Accepted(sent) = submission else {
      panic!("rejected")
    };
    assert_eq!(sent["inactive"], "false");
    assert_eq!(sent["orgCode"], "ZPR");

    let checked = values(&[("inactive", "true")]);
    assert_eq!(normalise(&ORGANIZATION, &Mode::Create, &checked)["inactive"], "true");
  }
}
