//! Index, create, edit and delete pages, written once for every resource.
//!
//! Each resource gets:
//!
//! | Method | Path                   | Handler        |
//! |--------|------------------------|----------------|
//! | GET    | `{route}`              | [`index`]      |
//! | GET    | `{route}/create`       | [`create_form`]|
//! | POST   | `{route}/create`       | [`create`]     |
//! | GET    | `{route}/edit/{key}`   | [`edit_form`]  |
//! | POST   | `{route}/edit/{key}`   | [`update`]     |
//! | POST   | `{route}/delete/{key}` | [`delete`]     |
//!
//! Mutations redirect (303) to the index on success. A failed backend call is
//! logged and the form is shown again with what the user typed.

use axum::{
  Form, Router,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
  routing::{get, post},
};
use roster_core::{Key, Resource, ResourceDescriptor, resources::ALL};
use serde_json::Value;

use crate::{
  AppState,
  backend::{Backend, BackendRequest},
  error::Result,
  form::{FormState, Mode, Submission, Values, render_form, submit},
  layout::page,
  query::QueryKey,
  session::Session,
  table::resource_table,
};

/// Mount the pages of resource `R`.
pub fn routes<B, R>(router: Router<AppState<B>>) -> Router<AppState<B>>
where
  B: Backend,
  R: Resource,
{
  let desc = R::descriptor();
  router
    .route(desc.route, get(index::<B, R>))
    .route(
      &desc.create_route(),
      get(create_form::<B, R>).post(create::<B, R>),
    )
    .route(
      &format!("{}/edit/{{key}}", desc.route),
      get(edit_form::<B, R>).post(update::<B, R>),
    )
    .route(
      &format!("{}/delete/{{key}}", desc.route),
      post(delete::<B, R>),
    )
}

// ─── Requests ────────────────────────────────────────────────────────────────

fn collection_request(desc: &ResourceDescriptor) -> BackendRequest {
  BackendRequest::get(desc.collection_url())
}

fn record_request(desc: &ResourceDescriptor, key: &Key) -> BackendRequest {
  BackendRequest::get(desc.api_base).param(desc.key.param, key.to_string())
}

/// `POST {api}/post` with every field as a query parameter.
fn create_request(desc: &ResourceDescriptor, values: &Values) -> BackendRequest {
  desc
    .create_specs()
    .fold(BackendRequest::post(desc.create_url()), |req, spec| {
      let value = values.get(spec.name).cloned().unwrap_or_default();
      req.param(spec.name, value)
    })
}

/// `PUT {api}?{param}={key}` with the editable fields as a JSON body.
fn update_request(
  desc: &ResourceDescriptor,
  key: &Key,
  values: &Values,
) -> BackendRequest {
  let body = desc
    .update_specs()
    .map(|spec| {
      let value = values.get(spec.name).cloned().unwrap_or_default();
      (spec.name.to_owned(), Value::String(value))
    })
    .collect();
  BackendRequest::put(desc.api_base)
    .param(desc.key.param, key.to_string())
    .json(Value::Object(body))
}

fn delete_request(desc: &ResourceDescriptor, key: &Key) -> BackendRequest {
  BackendRequest::delete(desc.api_base).param(desc.key.param, key.to_string())
}

fn parse_key(desc: &ResourceDescriptor, raw: &str) -> Result<Key> {
  Ok(desc.key.parse(raw)?)
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn form_page<B: Backend>(
  state: &AppState<B>,
  session: &Session,
  desc: &ResourceDescriptor,
  mode: &Mode,
  form: &FormState,
  status: StatusCode,
) -> Result<Response> {
  let heading = match mode {
    Mode::Create => desc.create_heading,
    Mode::Edit(_) => desc.edit_heading,
  };
  let toasts = state.toasts.drain(&session.scope);
  let body = page(heading, &session.user, &toasts, |html| {
    html.elem("h1", &[], heading);
    render_form(html, desc, mode, form, desc.route);
  })?;
  Ok((status, body).into_response())
}

/// The state to show again after the backend refused a valid submission.
fn resubmit(values: Values) -> FormState {
  FormState { values, submitted: true, ..FormState::default() }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET {route}`
pub async fn index<B: Backend, R: Resource>(
  session: Session,
  State(state): State<AppState<B>>,
) -> Result<Response> {
  let desc = R::descriptor();
  let records: Vec<Value> = session
    .query(&state)
    .fetch_or(&collection_request(desc), Vec::new())
    .await;

  let toasts = state.toasts.drain(&session.scope);
  let body = page(desc.title, &session.user, &toasts, |html| {
    html.elem("h1", &[], desc.title);
    if session.user.is_admin() {
      let href = desc.create_route();
      html.elem(
        "a",
        &[("href", &href), ("class", "btn btn-primary")],
        desc.create_button,
      );
    }
    resource_table(html, desc, &records, &session.user);
  })?;
  Ok(body.into_response())
}

/// `GET {route}/create`
pub async fn create_form<B: Backend, R: Resource>(
  session: Session,
  State(state): State<AppState<B>>,
) -> Result<Response> {
  session.require_admin()?;
  let desc = R::descriptor();
  form_page(
    &state,
    &session,
    desc,
    &Mode::Create,
    &FormState::blank(desc),
    StatusCode::OK,
  )
}

/// `POST {route}/create`
pub async fn create<B: Backend, R: Resource>(
  session: Session,
  State(state): State<AppState<B>>,
  Form(raw): Form<Values>,
) -> Result<Response> {
  session.require_admin()?;
  let desc = R::descriptor();
  let mode = Mode::Create;

  let (values, request) = match submit(desc, &mode, &raw, |values| {
    (values.clone(), create_request(desc, values))
  }) {
    Submission::Accepted(accepted) => accepted,
    Submission::Rejected(form) => {
      let status = StatusCode::UNPROCESSABLE_ENTITY;
      return form_page(&state, &session, desc, &mode, &form, status);
    }
  };

  let invalidates = [QueryKey::of(&collection_request(desc))];
  match session.query(&state).mutate::<R>(&request, &invalidates).await {
    Ok(created) => {
      state.toasts.push(&session.scope, created.created_message());
      Ok(Redirect::to(desc.route).into_response())
    }
    Err(err) if err.write_applied() => {
      Ok(Redirect::to(desc.route).into_response())
    }
    Err(_) => {
      let form = resubmit(values);
      form_page(&state, &session, desc, &mode, &form, StatusCode::OK)
    }
  }
}

/// `GET {route}/edit/{key}`
///
/// Until the record loads only the heading is shown. A cached copy is never
/// used in place of a failed fetch.
pub async fn edit_form<B: Backend, R: Resource>(
  session: Session,
  State(state): State<AppState<B>>,
  Path(raw_key): Path<String>,
) -> Result<Response> {
  session.require_admin()?;
  let desc = R::descriptor();
  let key = parse_key(desc, &raw_key)?;

  let record: Option<Value> = session
    .query(&state)
    .fetch_current(&record_request(desc, &key))
    .await;

  let toasts = state.toasts.drain(&session.scope);
  let mode = Mode::Edit(key);
  let body = page(desc.edit_heading, &session.user, &toasts, |html| {
    html.elem("h1", &[], desc.edit_heading);
    if let Some(record) = &record {
      let form = FormState::from_record(desc, record);
      render_form(html, desc, &mode, &form, desc.route);
    }
  })?;
  Ok(body.into_response())
}

/// `POST {route}/edit/{key}`
pub async fn update<B: Backend, R: Resource>(
  session: Session,
  State(state): State<AppState<B>>,
  Path(raw_key): Path<String>,
  Form(raw): Form<Values>,
) -> Result<Response> {
  session.require_admin()?;
  let desc = R::descriptor();
  let key = parse_key(desc, &raw_key)?;
  let mode = Mode::Edit(key.clone());

  let (values, request) = match submit(desc, &mode, &raw, |values| {
    (values.clone(), update_request(desc, &key, values))
  }) {
    Submission::Accepted(accepted) => accepted,
    Submission::Rejected(form) => {
      let status = StatusCode::UNPROCESSABLE_ENTITY;
      return form_page(&state, &session, desc, &mode, &form, status);
    }
  };

  let invalidates = [
    QueryKey::of(&collection_request(desc)),
    QueryKey::of(&record_request(desc, &key)),
  ];
  match session.query(&state).mutate::<R>(&request, &invalidates).await {
    Ok(updated) => {
      state.toasts.push(&session.scope, updated.updated_message());
      Ok(Redirect::to(desc.route).into_response())
    }
    Err(err) if err.write_applied() => {
      Ok(Redirect::to(desc.route).into_response())
    }
    Err(_) => {
      let form = resubmit(values);
      form_page(&state, &session, desc, &mode, &form, StatusCode::OK)
    }
  }
}

/// `POST {route}/delete/{key}`
///
/// Always lands back on the index; a failed delete leaves the row in place.
pub async fn delete<B: Backend, R: Resource>(
  session: Session,
  State(state): State<AppState<B>>,
  Path(raw_key): Path<String>,
) -> Result<Response> {
  session.require_admin()?;
  let desc = R::descriptor();
  let key = parse_key(desc, &raw_key)?;

  let invalidates = [
    QueryKey::of(&collection_request(desc)),
    QueryKey::of(&record_request(desc, &key)),
  ];
  let reply = session
    .query(&state)
    .mutate::<Value>(&delete_request(desc, &key), &invalidates)
    .await
    .ok();
  if let Some(message) = reply
    .as_ref()
    .and_then(|r| r.get("message"))
    .and_then(Value::as_str)
  {
    state.toasts.push(&session.scope, message);
  }
  Ok(Redirect::to(desc.route).into_response())
}

/// `GET /`
pub async fn home<B: Backend>(
  session: Session,
  State(state): State<AppState<B>>,
) -> Result<Response> {
  let toasts = state.toasts.drain(&session.scope);
  let body = page("Roster", &session.user, &toasts, |html| {
    html.elem("h1", &[], "Roster");
    html.open("ul", &[]);
    for desc in ALL {
      html
        .open("li", &[])
        .elem("a", &[("href", desc.route)], desc.title)
        .close("li");
    }
    html.close("ul");
  })?;
  Ok(body.into_response())
}
