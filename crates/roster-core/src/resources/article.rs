use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
  Key, Resource, ResourceDescriptor,
  field::{FieldKind, FieldSpec, Rule},
  key::KeySpec,
  resource::ColumnSpec,
};

/// A link to an article of interest, with a short explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  pub id:          i64,
  pub title:       String,
  pub url:         String,
  pub explanation: String,
  pub email:       String,
  pub date_added:  NaiveDateTime,
}

pub static ARTICLE: ResourceDescriptor = ResourceDescriptor {
  entity:         "Article",
  table:          "articles",
  api_base:       "/api/articles",
  route:          "/articles",
  title:          "Articles",
  form_test_id:   "ArticleForm",
  table_test_id:  "ArticlesTable",
  create_heading: "Create New Article",
  edit_heading:   "Edit Article",
  create_button:  "Create Article",
  key:            KeySpec { param: "id", column: "id", generated: true },
  fields:         &[
    FieldSpec {
      name:   "title",
      column: "title",
      label:  "Title",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Title is required.")],
    },
    FieldSpec {
      name:   "url",
      column: "url",
      label:  "Url",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Url is required.")],
    },
    FieldSpec {
      name:   "explanation",
      column: "explanation",
      label:  "Explanation",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Explanation is required.")],
    },
    FieldSpec {
      name:   "email",
      column: "email",
      label:  "Email",
      kind:   FieldKind::Email,
      rules:  &[Rule::Required("Email is required.")],
    },
    FieldSpec {
      name:   "dateAdded",
      column: "date_added",
      label:  "Date Added (iso format)",
      kind:   FieldKind::DateTime,
      rules:  &[
        Rule::Required("Date added is required."),
        Rule::IsoDateTime("Date added must be in ISO format."),
      ],
    },
  ],
  columns:        &[
    ColumnSpec { header: "id", field: "id" },
    ColumnSpec { header: "Title", field: "title" },
    ColumnSpec { header: "Url", field: "url" },
    ColumnSpec { header: "Explanation", field: "explanation" },
    ColumnSpec { header: "Email", field: "email" },
    ColumnSpec { header: "Date Added", field: "dateAdded" },
  ],
};

impl Resource for Article {
  fn descriptor() -> &'static ResourceDescriptor { &ARTICLE }

  fn key(&self) -> Key { Key::Id(self.id) }

  fn created_message(&self) -> String {
    format!("New article Created - id: {} title: {}", self.id, self.title)
  }

  fn updated_message(&self) -> String {
    format!("Article Updated - id: {} title: {}", self.id, self.title)
  }
}
