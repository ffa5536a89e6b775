//! Embedded document store on SQLite.
//!
//! Every record is one row of the `documents` table holding the collection
//! name and the record as JSON text. Filters and sorts go through
//! `json_extract`. Sorts rank values by `json_type` first so mixed types
//! come out in MongoDB's order: missing or null, numbers, strings, objects,
//! arrays, then booleans.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tracing::debug;

use super::{Direction, DocumentStore, Filter, Record, Sort};
use crate::error::{DryCleaningError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    body       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, id);
";

/// Document store backed by a SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    /// Open connection.
    conn: Connection,
    /// Database file, `None` when in memory.
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), journal_mode = %mode, "opened sqlite document store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Fresh store that lives only as long as the value.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path: None })
    }

    /// Database file, if any.
    pub fn db_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `sql` with `args` and decode the `body` column of every row.
    fn query_bodies(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(sql)?;
        let bodies = stmt
            .query_map(args, |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        bodies
            .iter()
            .map(|body| serde_json::from_str::<Record>(body).map_err(DryCleaningError::from))
            .collect()
    }
}

/// JSON path selecting `field`, where dots step into embedded objects.
///
/// Segments that are empty or contain a double quote cannot be expressed as
/// a quoted label; such fields are treated as absent from every record.
fn json_path(field: &str) -> Option<String> {
    let mut path = String::from("$");
    for segment in field.split('.') {
        if segment.is_empty() || segment.contains('"') {
            return None;
        }
        path.push_str(&format!(".\"{segment}\""));
    }
    Some(path)
}

/// Rank of the JSON type at `?2`, in MongoDB's cross-type sort order.
const TYPE_RANK: &str = "CASE json_type(body, ?2)
        WHEN 'integer' THEN 1 WHEN 'real' THEN 1
        WHEN 'text' THEN 2
        WHEN 'object' THEN 3
        WHEN 'array' THEN 4
        WHEN 'true' THEN 5 WHEN 'false' THEN 5
        ELSE 0
    END";

impl DocumentStore for SqliteStore {
    fn insert(&self, collection: &str, record: Record) -> Result<()> {
        let body = serde_json::to_string(&record)?;
        self.conn.execute(
            "INSERT INTO documents (collection, body) VALUES (?1, ?2)",
            params![collection, body],
        )?;
        debug!(collection, id = self.conn.last_insert_rowid(), "inserted document");
        Ok(())
    }

    fn find(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<Record>> {
        debug!(collection, ?filter, "find");
        let Some(filter) = filter else {
            return self.query_bodies(
                "SELECT body FROM documents WHERE collection = ?1 ORDER BY id",
                params![collection],
            );
        };
        let Some(path) = json_path(&filter.field) else {
            return Ok(Vec::new());
        };
        self.query_bodies(
            "SELECT body FROM documents
             WHERE collection = ?1 AND json_extract(body, ?2) = ?3
             ORDER BY id",
            params![collection, path, filter.value],
        )
    }

    fn find_first(&self, collection: &str, filter: &Filter) -> Result<Option<Record>> {
        debug!(collection, ?filter, "find first");
        let Some(path) = json_path(&filter.field) else {
            return Ok(None);
        };
        let mut found = self.query_bodies(
            "SELECT body FROM documents
             WHERE collection = ?1 AND json_extract(body, ?2) = ?3
             ORDER BY id LIMIT 1",
            params![collection, path, filter.value],
        )?;
        Ok(found.pop())
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let Some(path) = json_path(&filter.field) else {
            return Ok(0);
        };
        let deleted = self.conn.execute(
            "DELETE FROM documents WHERE id = (
                SELECT id FROM documents
                WHERE collection = ?1 AND json_extract(body, ?2) = ?3
                ORDER BY id LIMIT 1
             )",
            params![collection, path, filter.value],
        )?;
        debug!(collection, ?filter, deleted, "delete one");
        Ok(deleted as u64)
    }

    fn find_sorted(&self, collection: &str, sort: &Sort) -> Result<Vec<Record>> {
        debug!(collection, ?sort, "find sorted");
        let Some(path) = json_path(&sort.field) else {
            return self.find(collection, None);
        };
        let order = match sort.direction {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        };
        let sql = format!(
            "SELECT body FROM documents WHERE collection = ?1
             ORDER BY {TYPE_RANK} {order}, json_extract(body, ?2) {order}, id ASC"
        );
        self.query_bodies(&sql, params![collection, path])
    }
}
