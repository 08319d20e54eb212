//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::debug;

use roster_core::{Fields, Key, Resource, store::RecordStore};

use crate::{
  Error, Result,
  encode::{Layout, encode_fields, encode_key},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    debug!(path = %path.as_ref().display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn is_constraint_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn list<R: Resource>(&self) -> Result<Vec<R>> {
    let layout = Layout::new(R::descriptor());

    let rows: Vec<Fields> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&layout.select_all())?;
        let rows = stmt
          .query_map([], |row| layout.read_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|fields| R::from_fields(fields).map_err(Error::from))
      .collect()
  }

  async fn get<R: Resource>(&self, key: Key) -> Result<Option<R>> {
    let layout = Layout::new(R::descriptor());
    let key = encode_key(&key);

    let row: Option<Fields> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&layout.select_one(), [key], |row| layout.read_row(row))
            .optional()?,
        )
      })
      .await?;

    Ok(row.map(R::from_fields).transpose()?)
  }

  async fn create<R: Resource>(&self, fields: Fields) -> Result<R> {
    let desc = R::descriptor();
    let layout = Layout::new(desc);
    let values = encode_fields(desc.create_specs(), &fields)?;
    let natural_key = if desc.key.generated {
      None
    } else {
      Some(
        desc
          .key
          .from_record(&fields)
          .ok_or_else(|| roster_core::Error::MissingField(desc.key.param.to_owned()))?,
      )
    };
    let lookup = natural_key.as_ref().map(encode_key);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(&layout.insert(), rusqlite::params_from_iter(values))?;
        let key = match lookup {
          Some(key) => key,
          None => rusqlite::types::Value::Integer(tx.last_insert_rowid()),
        };
        let row =
          tx.query_row(&layout.select_one(), [key], |row| layout.read_row(row))?;
        tx.commit()?;
        Ok(row)
      })
      .await;

    match inserted {
      Ok(row) => Ok(R::from_fields(row)?),
      Err(e) if is_constraint_violation(&e) => {
        let key = natural_key.map(|k| k.to_string()).unwrap_or_default();
        Err(Error::Conflict(format!(
          "{} with id {key} already exists",
          desc.entity
        )))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn update<R: Resource>(&self, key: Key, fields: Fields) -> Result<Option<R>> {
    let desc = R::descriptor();
    let layout = Layout::new(desc);
    let mut values = encode_fields(desc.update_specs(), &fields)?;
    let key = encode_key(&key);
    values.push(key.clone());

    let row: Option<Fields> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed =
          tx.execute(&layout.update(), rusqlite::params_from_iter(values))?;
        if changed == 0 {
          return Ok(None);
        }
        let row =
          tx.query_row(&layout.select_one(), [key], |row| layout.read_row(row))?;
        tx.commit()?;
        Ok(Some(row))
      })
      .await?;

    Ok(row.map(R::from_fields).transpose()?)
  }

  async fn delete<R: Resource>(&self, key: Key) -> Result<bool> {
    let layout = Layout::new(R::descriptor());
    let key = encode_key(&key);

    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&layout.delete(), [key])?))
      .await?;

    Ok(changed > 0)
  }
}
