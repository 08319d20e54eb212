//! The six resources managed by Roster.

mod article;
mod dining_commons_menu_item;
mod help_request;
mod menu_item_review;
mod organization;
mod recommendation_request;

pub use article::{ARTICLE, Article};
pub use dining_commons_menu_item::{
  DINING_COMMONS_MENU_ITEM, DiningCommonsMenuItem,
};
pub use help_request::{HELP_REQUEST, HelpRequest};
pub use menu_item_review::{MENU_ITEM_REVIEW, MenuItemReview};
pub use organization::{ORGANIZATION, Organization};
pub use recommendation_request::{
  RECOMMENDATION_REQUEST, RecommendationRequest,
};

use crate::ResourceDescriptor;

/// Every descriptor, in navigation order.
pub static ALL: [&ResourceDescriptor; 6] = [
  &ARTICLE,
  &HELP_REQUEST,
  &MENU_ITEM_REVIEW,
  &DINING_COMMONS_MENU_ITEM,
  &RECOMMENDATION_REQUEST,
  &ORGANIZATION,
];

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use chrono::NaiveDate;
  use serde_json::json;

  use super::*;
  use crate::{Error, Key, Resource};

  fn params(pairs: &[(&str, &str)]) -> crate::Fields {
    pairs
      .iter()
      .map(|(k, v)| ((*k).to_owned(), json!(v)))
      .collect()
  }

  #[test]
  fn descriptor_fields_match_wire_names() {
    let review = MenuItemReview {
      id:            1,
      item_id:       27,
      review_email:  "cgaucho@ucsb.edu".into(),
      stars:         3,
      date_reviewed: NaiveDate::from_ymd_opt(2022, 1, 2)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap(),
      comments:      "bland".into(),
    };
    let fields = review.to_fields().unwrap();
    for spec in MENU_ITEM_REVIEW.fields {
      assert!(fields.contains_key(spec.name), "missing {}", spec.name);
    }
    for column in MENU_ITEM_REVIEW.columns {
      assert!(fields.contains_key(column.field), "missing {}", column.field);
    }
  }

  #[test]
  fn every_column_names_a_known_field() {
    let mut tables = BTreeMap::new();
    for d in ALL {
      assert!(tables.insert(d.table, d.entity).is_none());
      for column in d.columns {
        assert!(
          column.field == d.key.param || d.field(column.field).is_some(),
          "{}: unknown column {}",
          d.entity,
          column.field
        );
      }
    }
  }

  #[test]
  fn create_fields_coerces_query_strings() {
    let fields = MENU_ITEM_REVIEW
      .create_fields(&params(&[
        ("itemId", "27"),
        ("reviewEmail", "cgaucho@ucsb.edu"),
        ("stars", "3"),
        ("dateReviewed", "2022-01-02T12:00"),
        ("comments", "bland"),
        ("id", "99"),
      ]))
      .unwrap();
    assert_eq!(fields["itemId"], json!(27));
    assert_eq!(fields["dateReviewed"], json!("2022-01-02T12:00:00"));
    assert!(!fields.contains_key("id"));
  }

  #[test]
  fn update_fields_never_touch_a_natural_key() {
    let body = json!({
      "orgCode": "CHANGED",
      "orgTranslationShort": "Zeta Phi Rho",
      "orgTranslation": "Zeta Phi Rho",
      "inactive": false,
    });
    let fields = ORGANIZATION.update_fields(&body).unwrap();
    assert!(!fields.contains_key("orgCode"));
    assert_eq!(fields.len(), 3);
  }

  #[test]
  fn update_body_must_be_an_object() {
    let err = ARTICLE.update_fields(&json!([1, 2])).unwrap_err();
    assert!(matches!(err, Error::NotAnObject));
  }

  #[test]
  fn messages_name_the_entity() {
    assert_eq!(
      MENU_ITEM_REVIEW.not_found_message(&Key::Id(10)),
      "MenuItemReviews with id 10 not found"
    );
    assert_eq!(
      ORGANIZATION.deleted_message(&Key::from("ZPR")),
      "UCSBOrganizations with id ZPR deleted"
    );
  }

  #[test]
  fn toasts_carry_key_and_salient_field() {
    let article = Article {
      id:          17,
      title:       "title".into(),
      url:         "https://example.org".into(),
      explanation: "why".into(),
      email:       "a@ucsb.edu".into(),
      date_added:  NaiveDate::from_ymd_opt(2022, 2, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap(),
    };
    assert_eq!(article.created_message(), "New article Created - id: 17 title: title");

    let org = Organization {
      org_code:              "SKY".into(),
      org_translation_short: "Skydiving Club".into(),
      org_translation:       "Skydiving Club at UCSB".into(),
      inactive:              false,
    };
    assert_eq!(org.updated_message(), "UCSB Organization Updated - orgCode: SKY");
    assert_eq!(
      org.created_message(),
      "New Organization Created - orgCode: SKY orgTranslationShort: Skydiving \
       Club orgTranslation: Skydiving Club at UCSB inactive: false"
    );
  }

  #[test]
  fn routes_escape_natural_keys() {
    assert_eq!(
      ORGANIZATION.edit_route(&Key::from("A B")),
      "/ucsborganizations/edit/A%20B"
    );
    assert_eq!(ARTICLE.delete_route(&Key::Id(3)), "/articles/delete/3");
  }
}
