use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
  Key, Resource, ResourceDescriptor,
  field::{FieldKind, FieldSpec, Rule},
  key::KeySpec,
  resource::ColumnSpec,
};

/// A star rating of one dining-commons menu item.
///
/// `item_id` is not checked against the menu items table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemReview {
  pub id:            i64,
  pub item_id:       i64,
  pub review_email:  String,
  pub stars:         i64,
  pub date_reviewed: NaiveDateTime,
  pub comments:      String,
}

pub static MENU_ITEM_REVIEW: ResourceDescriptor = ResourceDescriptor {
  entity:         "MenuItemReviews",
  table:          "menuitemreviews",
  api_base:       "/api/menuitemreview",
  route:          "/menuitemreviews",
  title:          "MenuItemReviews",
  form_test_id:   "MenuItemReviewsForm",
  table_test_id:  "MenuItemReviewsTable",
  create_heading: "Create New MenuItemReviews",
  edit_heading:   "Edit MenuItemReviews",
  create_button:  "Create MenuItemReviews",
  key:            KeySpec { param: "id", column: "id", generated: true },
  fields:         &[
    FieldSpec {
      name:   "itemId",
      column: "item_id",
      label:  "Item ID",
      kind:   FieldKind::Integer,
      rules:  &[
        Rule::Required("Item ID is required."),
        Rule::Integer("Item ID must be a number."),
      ],
    },
    FieldSpec {
      name:   "reviewEmail",
      column: "review_email",
      label:  "Reviewer Email",
      kind:   FieldKind::Email,
      rules:  &[Rule::Required("Reviewer Email is required.")],
    },
    FieldSpec {
      name:   "stars",
      column: "stars",
      label:  "Stars",
      kind:   FieldKind::Integer,
      rules:  &[
        Rule::Required("Stars is required."),
        Rule::Integer("Stars must be a number."),
      ],
    },
    FieldSpec {
      name:   "dateReviewed",
      column: "date_reviewed",
      label:  "Date Reviewed (iso format)",
      kind:   FieldKind::DateTime,
      rules:  &[
        Rule::Required("Date Reviewed is required."),
        Rule::IsoDateTime("Date Reviewed is required."),
      ],
    },
    FieldSpec {
      name:   "comments",
      column: "comments",
      label:  "Comments",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Comments is required.")],
    },
  ],
  columns:        &[
    ColumnSpec { header: "id", field: "id" },
    ColumnSpec { header: "itemId", field: "itemId" },
    ColumnSpec { header: "reviewEmail", field: "reviewEmail" },
    ColumnSpec { header: "stars", field: "stars" },
    ColumnSpec { header: "dateReviewed", field: "dateReviewed" },
    ColumnSpec { header: "comments", field: "comments" },
  ],
};

impl Resource for MenuItemReview {
  fn descriptor() -> &'static ResourceDescriptor { &MENU_ITEM_REVIEW }

  fn key(&self) -> Key { Key::Id(self.id) }

  fn created_message(&self) -> String {
    format!(
      "New menuItemReviews Created - id: {} itemId: {}",
      self.id, self.item_id
    )
  }

  fn updated_message(&self) -> String {
    format!(
      "MenuItemReviews Updated - id: {} itemId: {}",
      self.id, self.item_id
    )
  }
}
