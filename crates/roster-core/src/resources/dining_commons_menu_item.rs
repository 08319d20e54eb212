use serde::{Deserialize, Serialize};

use crate::{
  Key, Resource, ResourceDescriptor,
  field::{FieldKind, FieldSpec, Rule},
  key::KeySpec,
  resource::ColumnSpec,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningCommonsMenuItem {
  pub id:                  i64,
  pub dining_commons_code: String,
  pub name:                String,
  pub station:             String,
}

pub static DINING_COMMONS_MENU_ITEM: ResourceDescriptor = ResourceDescriptor {
  entity:         "UCSBDiningCommonsMenuItem",
  table:          "ucsbdiningcommonsmenuitems",
  api_base:       "/api/ucsbdiningcommonsmenuitems",
  route:          "/ucsbdiningcommonsmenuitems",
  title:          "UCSBDiningCommonsMenuItems",
  form_test_id:   "UCSBDiningCommonsMenuItemForm",
  table_test_id:  "UCSBDiningCommonsMenuItemsTable",
  create_heading: "Create New UCSBDiningCommonsMenuItem",
  edit_heading:   "Edit UCSBDiningCommonsMenuItem",
  create_button:  "Create UCSBDiningCommonsMenuItem",
  key:            KeySpec { param: "id", column: "id", generated: true },
  fields:         &[
    FieldSpec {
      name:   "diningCommonsCode",
      column: "dining_commons_code",
      label:  "Dining Commons Code",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Dining Commons Code is required")],
    },
    FieldSpec {
      name:   "name",
      column: "name",
      label:  "Name",
      kind:   FieldKind::Text,
      rules:  &[
        Rule::Required("Name is required"),
        Rule::MaxLength(30, "Name must be 30 characters or less"),
      ],
    },
    FieldSpec {
      name:   "station",
      column: "station",
      label:  "Station",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Station is required")],
    },
  ],
  columns:        &[
    ColumnSpec { header: "id", field: "id" },
    ColumnSpec { header: "Dining Commons Code", field: "diningCommonsCode" },
    ColumnSpec { header: "Name", field: "name" },
    ColumnSpec { header: "Station", field: "station" },
  ],
};

impl Resource for DiningCommonsMenuItem {
  fn descriptor() -> &'static ResourceDescriptor { &DINING_COMMONS_MENU_ITEM }

  fn key(&self) -> Key { Key::Id(self.id) }

  fn created_message(&self) -> String {
    format!(
      "New ucsbDiningCommonsMenuItem Created - id: {} name: {}",
      self.id, self.name
    )
  }

  fn updated_message(&self) -> String {
    format!(
      "UCSBDiningCommonsMenuItem Updated - id: {} name: {}",
      self.id, self.name
    )
  }
}
