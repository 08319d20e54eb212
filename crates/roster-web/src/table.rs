//! Generic record tables.
//!
//! A table is a list of [`Column`]s applied to a list of JSON records. Every
//! header and cell carries a `data-testid` derived from the table's test id
//! and the column's accessor, so a cell can be addressed as
//! `{test_id}-cell-row-{row}-col-{accessor}`.

use std::{fmt, sync::Arc};

use axum::http::Method;
use roster_core::{CurrentUser, ResourceDescriptor, field::display_value};
use serde_json::Value;

use crate::html::Html;

// ─── Columns ─────────────────────────────────────────────────────────────────

/// Where a button sends the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
  pub method: Method,
  pub href:   String,
}

impl Action {
  pub fn get(href: impl Into<String>) -> Self {
    Self { method: Method::GET, href: href.into() }
  }

  pub fn post(href: impl Into<String>) -> Self {
    Self { method: Method::POST, href: href.into() }
  }
}

pub type Compute = Arc<dyn Fn(&Value) -> String + Send + Sync>;
pub type Callback = Arc<dyn Fn(&Value) -> Option<Action> + Send + Sync>;

#[derive(Clone)]
pub enum Accessor {
  /// A field of the record, by wire name.
  Field(String),
  /// A named function of the record.
  Computed { name: String, compute: Compute },
  /// A button labelled `label`; `callback` maps the row to its action.
  Button {
    label:    String,
    variant:  String,
    callback: Callback,
    test_id:  String,
  },
}

impl Accessor {
  /// The name used in test ids.
  pub fn name(&self) -> &str {
    match self {
      Accessor::Field(name) => name,
      Accessor::Computed { name, .. } => name,
      Accessor::Button { label, .. } => label,
    }
  }
}

impl fmt::Debug for Accessor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Accessor::Field(name) => f.debug_tuple("Field").field(name).finish(),
      Accessor::Computed { name, .. } => {
        f.debug_struct("Computed").field("name", name).finish_non_exhaustive()
      }
      Accessor::Button { label, variant, .. } => f
        .debug_struct("Button")
        .field("label", label)
        .field("variant", variant)
        .finish_non_exhaustive(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Column {
  pub header:   String,
  pub accessor: Accessor,
}

impl Column {
  pub fn field(header: impl Into<String>, field: impl Into<String>) -> Self {
    Self {
      header:   header.into(),
      accessor: Accessor::Field(field.into()),
    }
  }

  pub fn computed(
    header: impl Into<String>,
    name: impl Into<String>,
    compute: impl Fn(&Value) -> String + Send + Sync + 'static,
  ) -> Self {
    Self {
      header:   header.into(),
      accessor: Accessor::Computed {
        name:    name.into(),
        compute: Arc::new(compute),
      },
    }
  }
}

/// A column whose cells hold one button each.
///
/// No role check happens here; callers decide whether to add the column.
/// Buttons are identified as `{test_id}-cell-row-{row}-col-{label}-button`.
pub fn button_column(
  label: &str,
  variant: &str,
  callback: impl Fn(&Value) -> Option<Action> + Send + Sync + 'static,
  test_id: &str,
) -> Column {
  Column {
    header:   label.to_owned(),
    accessor: Accessor::Button {
      label:    label.to_owned(),
      variant:  variant.to_owned(),
      callback: Arc::new(callback),
      test_id:  test_id.to_owned(),
    },
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn render_button(
  html: &mut Html,
  action: &Action,
  label: &str,
  variant: &str,
  button_id: &str,
) {
  let class = format!("btn btn-{variant}");
  if action.method == Method::GET {
    html.elem(
      "a",
      &[
        ("href", &action.href),
        ("class", &class),
        ("data-testid", button_id),
      ],
      label,
    );
  } else {
    html
      .open("form", &[("method", "post"), ("action", &action.href)])
      .elem(
        "button",
        &[
          ("type", "submit"),
          ("class", &class),
          ("data-testid", button_id),
        ],
        label,
      )
      .close("form");
  }
}

/// Render `records` as an HTML table.
///
/// Absent or null fields produce empty cells.
pub fn render_table(
  html: &mut Html,
  records: &[Value],
  columns: &[Column],
  test_id: &str,
) {
  html.open("table", &[("class", "table table-striped"), ("data-testid", test_id)]);

  html.open("thead", &[]).open("tr", &[]);
  for column in columns {
    let id = format!("{test_id}-header-{}", column.accessor.name());
    html.elem("th", &[("data-testid", &id)], &column.header);
  }
  html.close("tr").close("thead");

  html.open("tbody", &[]);
  for (row, record) in records.iter().enumerate() {
    html.open("tr", &[]);
    for column in columns {
      let cell_id = format!("{test_id}-cell-row-{row}-col-{}", column.accessor.name());
      match &column.accessor {
        Accessor::Field(name) => {
          let text = display_value(record.get(name));
          html.elem("td", &[("data-testid", &cell_id)], &text);
        }
        Accessor::Computed { compute, .. } => {
          html.elem("td", &[("data-testid", &cell_id)], &compute(record));
        }
        Accessor::Button { label, variant, callback, test_id } => {
          html.open("td", &[("data-testid", &cell_id)]);
          if let Some(action) = callback(record) {
            let button_id = format!("{test_id}-cell-row-{row}-col-{label}-button");
            render_button(html, &action, label, variant, &button_id);
          }
          html.close("td");
        }
      }
    }
    html.close("tr");
  }
  html.close("tbody").close("table");
}

// ─── Resource tables ─────────────────────────────────────────────────────────

/// The data columns of a resource.
pub fn resource_columns(desc: &ResourceDescriptor) -> Vec<Column> {
  desc
    .columns
    .iter()
    .map(|col| Column::field(col.header, col.field))
    .collect()
}

/// The index-page table: data columns, plus Edit and Delete for admins.
pub fn resource_table(
  html: &mut Html,
  desc: &'static ResourceDescriptor,
  records: &[Value],
  user: &CurrentUser,
) {
  let mut columns = resource_columns(desc);
  if user.is_admin() {
    let key_of = move |record: &Value| {
      record.as_object().and_then(|fields| desc.key.from_record(fields))
    };
    columns.push(button_column(
      "Edit",
      "primary",
      move |record| key_of(record).map(|key| Action::get(desc.edit_route(&key))),
      desc.table_test_id,
    ));
    columns.push(button_column(
      "Delete",
      "danger",
      move |record| key_of(record).map(|key| Action::post(desc.delete_route(&key))),
      desc.table_test_id,
    ));
  }
  render_table(html, records, &columns, desc.table_test_id);
}
