use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
  Key, Resource, ResourceDescriptor,
  field::{FieldKind, FieldSpec, Rule},
  key::KeySpec,
  resource::ColumnSpec,
};

/// A team's request for help during a lab session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
  pub id:                     i64,
  pub requester_email:        String,
  pub team_id:                String,
  pub table_or_breakout_room: String,
  pub request_time:           NaiveDateTime,
  pub explanation:            String,
  pub solved:                 bool,
}

pub static HELP_REQUEST: ResourceDescriptor = ResourceDescriptor {
  entity:         "HelpRequest",
  table:          "helprequests",
  api_base:       "/api/helprequest",
  route:          "/helprequest",
  title:          "HelpRequest",
  form_test_id:   "HelpRequestForm",
  table_test_id:  "HelpRequestTable",
  create_heading: "Create New HelpRequest",
  edit_heading:   "Edit HelpRequest",
  create_button:  "Create HelpRequest",
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
      name:   "teamId",
      column: "team_id",
      label:  "Team Id",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Team Id is required.")],
    },
    FieldSpec {
      name:   "tableOrBreakoutRoom",
      column: "table_or_breakout_room",
      label:  "Table Or Breakout Room",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Table Or Breakout Room is required.")],
    },
    FieldSpec {
      name:   "requestTime",
      column: "request_time",
      label:  "Request Time (iso format)",
      kind:   FieldKind::DateTime,
      rules:  &[
        Rule::Required("Request Time is required."),
        Rule::IsoDateTime("Request Time must be in ISO format."),
      ],
    },
    FieldSpec {
      name:   "explanation",
      column: "explanation",
      label:  "Explanation",
      kind:   FieldKind::Text,
      rules:  &[Rule::Required("Explanation is required.")],
    },
    FieldSpec {
      name:   "solved",
      column: "solved",
      label:  "Solved",
      kind:   FieldKind::Boolean,
      rules:  &[],
    },
  ],
  columns:        &[
    ColumnSpec { header: "id", field: "id" },
    ColumnSpec { header: "Requester Email", field: "requesterEmail" },
    ColumnSpec { header: "Team Id", field: "teamId" },
    ColumnSpec { header: "Table Or Breakout Room", field: "tableOrBreakoutRoom" },
    ColumnSpec { header: "Request Time", field: "requestTime" },
    ColumnSpec { header: "Explanation", field: "explanation" },
    ColumnSpec { header: "Solved", field: "solved" },
  ],
};

impl Resource for HelpRequest {
  fn descriptor() -> &'static ResourceDescriptor { &HELP_REQUEST }

  fn key(&self) -> Key { Key::Id(self.id) }

  fn created_message(&self) -> String {
    format!(
      "New helpRequest Created - id: {} explanation: {}",
      self.id, self.explanation
    )
  }

  fn updated_message(&self) -> String {
    format!(
      "helpRequest Updated - id: {} explanation: {}",
      self.id, self.explanation
    )
  }
}
