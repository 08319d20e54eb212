use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
  Key, Resource, ResourceDescriptor,
  field::{FieldKind, FieldSpec, Rule},
  key::KeySpec,
  resource::ColumnSpec,
};

/// A student's request for a letter of recommendation from a professor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
  pub id:              i64,
  pub requester_email: String,
  pub professor_email: String,
  pub explanation:     String,
  pub date_requested:  NaiveDateTime,
  pub date_needed:     NaiveDateTime,
  pub done:            bool,
}

pub static RECOMMENDATION_REQUEST: ResourceDescriptor = ResourceDescriptor {
  entity:         "RecommendationRequest",
  table:          "recommendationrequests",
  api_base:       "/api/RecommendationRequest",
  route:          "/RecommendationRequest",
  title:          "Recommendation Requests",
  form_test_id:   "RecommendationRequestForm",
  table_test_id:  "RecommendationRequestTable",
  create_heading: "Create New Recommendation Request",
  edit_heading:   "Edit Recommendation Request",
  create_button:  "Create Recommendation Request",
  key:            KeySpec { param: "id", column: "id", generated: true },
  fields:         &[
    FieldSpec {
      name:   "requesterEmail",
      column: "requester_email",
      label:  "Requester Email",
      kind:   FieldKind::Email,
      rules:  &[Rule::Required("Requester Email is required.")],
    },
    FieldSpec {
      name:   "professorEmail",
      column: "professor_email",
      label:  "Professor Email",
      kind:   FieldKind::Email,
      rules:  &[Rule::Required("Professor Email is required.")],
    },
    FieldSpec {
      name:   "explanation",
      column: "explanation",
      label:  "Explanation",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Explanation is required.")],
    },
    FieldSpec {
      name:   "dateRequested",
      column: "date_requested",
      label:  "Date Requested (iso format)",
      kind:   FieldKind::DateTime,
      rules:  &[
        Rule::Required("Date Requested is required."),
        Rule::IsoDateTime("Date Requested must be in ISO format."),
      ],
    },
    FieldSpec {
      name:   "dateNeeded",
      column: "date_needed",
      label:  "Date Needed (iso format)",
      kind:   FieldKind::DateTime,
      rules:  &[
        Rule::Required("Date Needed is required."),
        Rule::IsoDateTime("Date Needed must be in ISO format."),
      ],
    },
    FieldSpec {
      name:   "done",
      column: "done",
      label:  "Done",
      kind:   FieldKind::Boolean,
      rules:  &[],
    },
  ],
  columns:        &[
    ColumnSpec { header: "id", field: "id" },
    ColumnSpec { header: "Requester Email", field: "requesterEmail" },
    ColumnSpec { header: "Professor Email", field: "professorEmail" },
    ColumnSpec { header: "Explanation", field: "explanation" },
    ColumnSpec { header: "Date Requested", field: "dateRequested" },
    ColumnSpec { header: "Date Needed", field: "dateNeeded" },
    ColumnSpec { header: "Done", field: "done" },
  ],
};

impl Resource for RecommendationRequest {
  fn descriptor() -> &'static ResourceDescriptor { &RECOMMENDATION_REQUEST }

  fn key(&self) -> Key { Key::Id(self.id) }

  fn created_message(&self) -> String {
    format!(
      "New Recommendation Request Created - id: {} Requester Email: {}",
      self.id, self.requester_email
    )
  }

  fn updated_message(&self) -> String {
    format!(
      "Recommendation Request Updated - id: {} Requester Email: {}",
      self.id, self.requester_email
    )
  }
}
