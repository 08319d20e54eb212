//! Generic CRUD handlers, instantiated once per resource.
//!
//! | Method   | Path           | Input                              | Role  |
//! |----------|----------------|------------------------------------|-------|
//! | `GET`    | `{base}/all`   | —                                  | USER  |
//! | `GET`    | `{base}`       | `?{key}=`                          | USER  |
//! | `POST`   | `{base}/post`  | fields as query parameters         | ADMIN |
//! | `PUT`    | `{base}`       | `?{key}=`, JSON body of the fields | ADMIN |
//! | `DELETE` | `{base}`       | `?{key}=`                          | ADMIN |
//!
//! `{key}` is `id` for surrogate-keyed resources and the natural key's name
//! (e.g. `orgCode`) otherwise.

use std::collections::HashMap;

use axum::{
  Json, Router,
  extract::{Query, State},
  routing::{get, post},
};
use roster_core::{Fields, Key, Resource, store::RecordStore};
use serde_json::{Value, json};

use crate::{
  ApiState,
  auth::{Admin, Authenticated},
  error::ApiError,
};

type Params = HashMap<String, String>;

/// Mount the five endpoints of `R` under its API base.
pub fn routes<S, R>(router: Router<ApiState<S>>) -> Router<ApiState<S>>
where
  S: RecordStore + 'static,
  R: Resource,
{
  let desc = R::descriptor();
  router
    .route(&desc.collection_url(), get(list::<S, R>))
    .route(&desc.create_url(), post(create::<S, R>))
    .route(
      desc.api_base,
      get(get_one::<S, R>).put(update::<S, R>).delete(delete::<S, R>),
    )
}

fn key_param<R: Resource>(params: &Params) -> Result<Key, ApiError> {
  let spec = R::descriptor().key;
  let raw = params.get(spec.param).ok_or_else(|| {
    ApiError::BadRequest(format!(
      "Required request parameter '{}' is not present",
      spec.param
    ))
  })?;
  Ok(spec.parse(raw)?)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET {base}/all`
pub async fn list<S: RecordStore, R: Resource>(
  State(state): State<ApiState<S>>,
  _user: Authenticated,
) -> Result<Json<Vec<R>>, ApiError> {
  let records = state.store.list::<R>().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET {base}?{key}=`
pub async fn get_one<S: RecordStore, R: Resource>(
  State(state): State<ApiState<S>>,
  _user: Authenticated,
  Query(params): Query<Params>,
) -> Result<Json<R>, ApiError> {
  let key = key_param::<R>(&params)?;
  state
    .store
    .get::<R>(key.clone())
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(R::descriptor().not_found_message(&key)))
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// `POST {base}/post?field=value&...`
///
/// A surrogate `id` among the parameters is ignored.
pub async fn create<S: RecordStore, R: Resource>(
  State(state): State<ApiState<S>>,
  _admin: Admin,
  Query(params): Query<Params>,
) -> Result<Json<R>, ApiError> {
  let source: Fields = params
    .into_iter()
    .map(|(k, v)| (k, Value::String(v)))
    .collect();
  let fields = R::descriptor().create_fields(&source)?;
  let record = state.store.create::<R>(fields).await.map_err(ApiError::store)?;
  Ok(Json(record))
}

/// `PUT {base}?{key}=` with the record's fields as a JSON body.
pub async fn update<S: RecordStore, R: Resource>(
  State(state): State<ApiState<S>>,
  _admin: Admin,
  Query(params): Query<Params>,
  Json(body): Json<Value>,
) -> Result<Json<R>, ApiError> {
  let desc = R::descriptor();
  let key = key_param::<R>(&params)?;
  let fields = desc.update_fields(&body)?;
  state
    .store
    .update::<R>(key.clone(), fields)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(desc.not_found_message(&key)))
}

/// `DELETE {base}?{key}=`
pub async fn delete<S: RecordStore, R: Resource>(
  State(state): State<ApiState<S>>,
  _admin: Admin,
  Query(params): Query<Params>,
) -> Result<Json<Value>, ApiError> {
  let desc = R::descriptor();
  let key = key_param::<R>(&params)?;
  let deleted = state
    .store
    .delete::<R>(key.clone())
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(desc.not_found_message(&key)));
  }
  Ok(Json(json!({ "message": desc.deleted_message(&key) })))
}
