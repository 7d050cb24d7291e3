//! Resource store adapter.
//!
//! Wraps key-based get/put/delete plus kind-scoped queries over a single
//! `records` table of JSON documents. Ids are store-assigned and
//! monotonically increasing; query resumption uses opaque base64 cursors.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::db::DbPool;
use crate::error::{AppError, Result};

pub const EXERCISES: &str = "exercises";
pub const WORKOUTS: &str = "workouts";

/// One page of a kind-scoped query.
pub struct QueryPage<T> {
    pub items: Vec<T>,
    /// Cursor positioned after the last item of this page.
    pub end_cursor: Option<String>,
    /// Whether the store holds more records beyond this page.
    pub more: bool,
}

#[derive(Clone)]
pub struct Datastore {
    pool: DbPool,
}

impl Datastore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new record and return its store-assigned id.
    pub async fn create<T>(&self, kind: &'static str, data: &T) -> Result<i64>
    where
        T: Serialize,
    {
        let pool = self.pool.clone();
        let body = to_stored_json(data)?;
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO records (kind, data) VALUES (?, ?)",
                rusqlite::params![kind, body],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn get<T>(&self, kind: &'static str, id: i64) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT data FROM records WHERE kind = ? AND id = ?")?;
            let mut rows = stmt.query(rusqlite::params![kind, id])?;
            match rows.next()? {
                Some(row) => {
                    let body: String = row.get(0)?;
                    Ok(Some(from_stored_json(id, &body)?))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Overwrite an existing record. Fails with `NotFound` if the key
    /// vanished since it was read.
    pub async fn put<T>(&self, kind: &'static str, id: i64, data: &T) -> Result<()>
    where
        T: Serialize,
    {
        let pool = self.pool.clone();
        let body = to_stored_json(data)?;
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE records SET data = ? WHERE kind = ? AND id = ?",
                rusqlite::params![body, kind, id],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound);
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, kind: &'static str, id: i64) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM records WHERE kind = ? AND id = ?",
                rusqlite::params![kind, id],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound);
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Unlimited count of a kind. Runs as its own round-trip, so the total
    /// can be stale relative to a page fetched next to it.
    pub async fn count(&self, kind: &'static str) -> Result<usize> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM records WHERE kind = ?",
                [kind],
                |row| row.get(0),
            )?;
            Ok(n as usize)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Fetch at most `limit` records of a kind, resuming after `cursor`.
    pub async fn query<T>(
        &self,
        kind: &'static str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<QueryPage<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let after = match cursor {
            Some(c) => decode_cursor(c)?,
            None => 0,
        };

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT id, data FROM records WHERE kind = ? AND id > ? ORDER BY id LIMIT ?",
            )?;
            // Fetch one extra row to learn whether more records follow.
            let mut rows = stmt.query(rusqlite::params![kind, after, (limit + 1) as i64])?;

            let mut items: Vec<T> = Vec::new();
            let mut last_id = 0i64;
            let mut more = false;
            while let Some(row) = rows.next()? {
                if items.len() == limit {
                    more = true;
                    break;
                }
                let id: i64 = row.get(0)?;
                let body: String = row.get(1)?;
                items.push(from_stored_json(id, &body)?);
                last_id = id;
            }

            let end_cursor = (!items.is_empty()).then(|| encode_cursor(last_id));
            Ok(QueryPage {
                items,
                end_cursor,
                more,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Full scan of a kind, no limit and no cursor.
    pub async fn scan<T>(&self, kind: &'static str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt =
                conn.prepare("SELECT id, data FROM records WHERE kind = ? ORDER BY id")?;
            let mut rows = stmt.query([kind])?;

            let mut items: Vec<T> = Vec::new();
            while let Some(row) = rows.next()? {
                let id: i64 = row.get(0)?;
                let body: String = row.get(1)?;
                items.push(from_stored_json(id, &body)?);
            }
            Ok(items)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

pub fn encode_cursor(id: i64) -> String {
    STANDARD.encode(id.to_string())
}

pub fn decode_cursor(cursor: &str) -> Result<i64> {
    let bytes = STANDARD
        .decode(cursor)
        .map_err(|_| AppError::BadRequest("Invalid cursor".to_string()))?;
    String::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid cursor".to_string()))
}

/// Serialize a record for storage, dropping the id field (the key carries
/// the id).
fn to_stored_json<T: Serialize>(data: &T) -> Result<String> {
    let mut value = serde_json::to_value(data)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value.to_string())
}

/// Deserialize a stored record, injecting the key's id into the document.
fn from_stored_json<T: DeserializeOwned>(id: i64, body: &str) -> Result<T> {
    let mut value: Value = serde_json::from_str(body)?;
    if let Value::Object(map) = &mut value {
        map.insert("id".to_string(), id.into());
    }
    Ok(serde_json::from_value(value)?)
}
