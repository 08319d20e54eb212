use serde::{Deserialize, Serialize};

use crate::{
  Key, Resource, ResourceDescriptor,
  field::{FieldKind, FieldSpec, Rule},
  key::KeySpec,
  resource::ColumnSpec,
};

/// A student organization, keyed by its short code (e.g. `ZPR`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
  pub org_code:              String,
  pub org_translation_short: String,
  pub org_translation:       String,
  pub inactive:              bool,
}

pub static ORGANIZATION: ResourceDescriptor = ResourceDescriptor {
  entity:         "UCSBOrganizations",
  table:          "ucsborganizations",
  api_base:       "/api/ucsborganizations",
  route:          "/ucsborganizations",
  title:          "UCSB Organizations",
  form_test_id:   "UCSBOrganizationForm",
  table_test_id:  "UCSBOrganizationTable",
  create_heading: "Create New Organization",
  edit_heading:   "Edit UCSB Organization",
  create_button:  "Create Organization",
  key:            KeySpec {
    param:     "orgCode",
    column:    "org_code",
    generated: false,
  },
  fields:         &[
    FieldSpec {
      name:   "orgCode",
      column: "org_code",
      label:  "Organization Code",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Organization Code is required.")],
    },
    FieldSpec {
      name:   "orgTranslationShort",
      column: "org_translation_short",
      label:  "Organization Translation Short",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Organization Translation Short is required.")],
    },
    FieldSpec {
      name:   "orgTranslation",
      column: "org_translation",
      label:  "Organization Translation",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Organization Translation is required.")],
    },
    FieldSpec {
      name:   "inactive",
      column: "inactive",
      label:  "Inactive",
      kind:   FieldKind::Boolean,
      rules:  &[],
    },
  ],
  columns:        &[
    ColumnSpec { header: "Organization Code", field: "orgCode" },
    ColumnSpec { header: "Translation Short", field: "orgTranslationShort" },
    ColumnSpec { header: "Translation", field: "orgTranslation" },
    ColumnSpec { header: "Inactive", field: "inactive" },
  ],
};

impl Resource for Organization {
  fn descriptor() -> &'static ResourceDescriptor { &ORGANIZATION }

  fn key(&self) -> Key { Key::Code(self.org_code.clone()) }

  fn created_message(&self) -> String {
    format!(
      "New Organization Created - orgCode: {} orgTranslationShort: {} \
       orgTranslation: {} inactive: {}",
      self.org_code, self.org_translation_short, self.org_translation, self.inactive
    )
  }

  fn updated_message(&self) -> String {
    format!("UCSB Organization Updated - orgCode: {}", self.org_code)
  }
}
