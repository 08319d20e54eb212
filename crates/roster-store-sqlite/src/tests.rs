//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use roster_core::{
  Fields, Key, Resource,
  resources::{
    Article, HelpRequest, MENU_ITEM_REVIEW, MenuItemReview, ORGANIZATION,
    Organization,
  },
  store::RecordStore,
};
use serde_json::json;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn fields(value: serde_json::Value) -> Fields {
  value.as_object().cloned().expect("object")
}

fn review_fields(item_id: i64, stars: i64) -> Fields {
  MENU_ITEM_REVIEW
    .create_fields(&fields(json!({
      "itemId": item_id,
      "reviewEmail": "cgaucho@ucsb.edu",
      "stars": stars,
      "dateReviewed": "2022-01-02T12:00",
      "comments": "bland",
    })))
    .unwrap()
}

fn org_fields(code: &str) -> Fields {
  ORGANIZATION
    .create_fields(&fields(json!({
      "orgCode": code,
      "orgTranslationShort": "Zeta Phi Rho",
      "orgTranslation": "Zeta Phi Rho Fraternity",
      "inactive": "false",
    })))
    .unwrap()
}

// ─── Surrogate keys ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_ids() {
  let s = store().await;

  let first: MenuItemReview = s.create(review_fields(27, 3)).await.unwrap();
  let second: MenuItemReview = s.create(review_fields(29, 5)).await.unwrap();

  assert_eq!(first.id, 1);
  assert_eq!(second.id, 2);
  assert_eq!(second.item_id, 29);
  assert_eq!(
    first.date_reviewed,
    NaiveDate::from_ymd_opt(2022, 1, 2)
      .unwrap()
      .and_hms_opt(12, 0, 0)
      .unwrap()
  );
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let found: Option<Article> = s.get(Key::Id(7)).await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn list_is_in_key_order() {
  let s = store().await;
  for item in [10, 11, 12] {
    let _: MenuItemReview = s.create(review_fields(item, 4)).await.unwrap();
  }

  let all: Vec<MenuItemReview> = s.list().await.unwrap();
  let ids: Vec<_> = all.iter().map(|r| r.id).collect();
  assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn resources_are_stored_separately() {
  let s = store().await;
  let _: MenuItemReview = s.create(review_fields(1, 1)).await.unwrap();

  let articles: Vec<Article> = s.list().await.unwrap();
  let help: Vec<HelpRequest> = s.list().await.unwrap();
  assert!(articles.is_empty());
  assert!(help.is_empty());
}

#[tokio::test]
async fn update_overwrites_fields_but_not_id() {
  let s = store().await;
  let created: MenuItemReview = s.create(review_fields(27, 3)).await.unwrap();

  let changes = MENU_ITEM_REVIEW
    .update_fields(&json!({
      "id": 999,
      "itemId": 28,
      "reviewEmail": "ldelplaya@ucsb.edu",
      "stars": 5,
      "dateReviewed": "2023-03-04T05:06:07",
      "comments": "much better",
    }))
    .unwrap();
  let updated: MenuItemReview =
    s.update(created.key(), changes).await.unwrap().unwrap();

  assert_eq!(updated.id, created.id);
  assert_eq!(updated.stars, 5);
  assert_eq!(updated.comments, "much better");

  let missing: Option<MenuItemReview> = s.get(Key::Id(999)).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let changes = MENU_ITEM_REVIEW.update_fields(&json!(review_fields(1, 1))).unwrap();
  let result: Option<MenuItemReview> = s.update(Key::Id(5), changes).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_is_hard() {
  let s = store().await;
  let created: MenuItemReview = s.create(review_fields(27, 3)).await.unwrap();

  assert!(s.delete::<MenuItemReview>(created.key()).await.unwrap());
  assert!(!s.delete::<MenuItemReview>(created.key()).await.unwrap());

  let all: Vec<MenuItemReview> = s.list().await.unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn create_rejects_uncoerced_fields() {
  let s = store().await;
  let raw = fields(json!({
    "title": "t",
    "url": "u",
    "explanation": "e",
    "email": "e@ucsb.edu",
  }));
  let err = s.create::<Article>(raw).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(roster_core::Error::MissingField(ref f)) if f == "dateAdded"
  ));
}

// ─── Natural keys ────────────────────────────────────────────────────────────

#[tokio::test]
async fn natural_key_roundtrip() {
  let s = store().await;
  let created: Organization = s.create(org_fields("ZPR")).await.unwrap();
  assert_eq!(created.org_code, "ZPR");
  assert!(!created.inactive);

  let fetched: Organization = s.get(Key::from("ZPR")).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn duplicate_natural_key_conflicts() {
  let s = store().await;
  let _: Organization = s.create(org_fields("SKY")).await.unwrap();

  let err = s.create::<Organization>(org_fields("SKY")).await.unwrap_err();
  match err {
    Error::Conflict(msg) => {
      assert_eq!(msg, "UCSBOrganizations with id SKY already exists")
    }
    other => panic!("expected conflict, got {other:?}"),
  }

  let all: Vec<Organization> = s.list().await.unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn update_keeps_natural_key() {
  let s = store().await;
  let _: Organization = s.create(org_fields("OSLI")).await.unwrap();

  let changes = ORGANIZATION
    .update_fields(&json!({
      "orgCode": "OTHER",
      "orgTranslationShort": "Student Life",
      "orgTranslation": "Office of Student Life",
      "inactive": true,
    }))
    .unwrap();
  let updated: Organization =
    s.update(Key::from("OSLI"), changes).await.unwrap().unwrap();

  assert_eq!(updated.org_code, "OSLI");
  assert!(updated.inactive);
  assert!(s.get::<Organization>(Key::from("OTHER")).await.unwrap().is_none());
}
