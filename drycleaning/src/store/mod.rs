//! Document store boundary.
//!
//! The command loop only needs a handful of primitives per named collection,
//! captured by [`DocumentStore`]. Two backends implement it: [`MongoStore`]
//! talks to a MongoDB server, [`SqliteStore`] keeps JSON documents in a local
//! SQLite database (a file, or memory for tests).

mod mongo;
mod sqlite;

pub use mongo::MongoStore;
pub use sqlite::SqliteStore;

use crate::config::{Backend, Config};
use crate::error::Result;

/// A semi-structured record: field names to JSON values, in insertion order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Field every collection is looked up by.
pub const NAME_FIELD: &str = "name";

/// Exact, case-sensitive equality on one string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field to compare.
    pub field: String,
    /// Value the field must equal.
    pub value: String,
}

impl Filter {
    /// Match records whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Match records by their `name` field.
    pub fn by_name(value: impl Into<String>) -> Self {
        Self::eq(NAME_FIELD, value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Field to order by.
    pub field: String,
    /// Direction.
    pub direction: Direction,
}

impl Sort {
    /// Ascending order on `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    /// Descending order on `field`.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

/// Primitives the console needs from a document database.
///
/// Collections are addressed by name and spring into existence on first
/// insert. Records are stored as given; no schema is checked.
pub trait DocumentStore {
    /// Append `record` to `collection`.
    fn insert(&self, collection: &str, record: Record) -> Result<()>;

    /// Records of `collection` in storage order, optionally filtered.
    fn find(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<Record>>;

    /// First record in storage order matching `filter`.
    fn find_first(&self, collection: &str, filter: &Filter) -> Result<Option<Record>> {
        Ok(self.find(collection, Some(filter))?.into_iter().next())
    }

    /// Remove the first record matching `filter`, returning how many were removed.
    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Every record of `collection` ordered by `sort`.
    ///
    /// Values of different types order as MongoDB does: missing or null,
    /// numbers, strings, objects, arrays, booleans. Ascending puts missing
    /// fields first. A dotted field such as `pickup.day` names a field of an
    /// embedded object. Ties keep storage order.
    fn find_sorted(&self, collection: &str, sort: &Sort) -> Result<Vec<Record>>;
}

/// Open the store selected by `config`.
pub fn open(config: &Config) -> Result<Box<dyn DocumentStore>> {
    let store: Box<dyn DocumentStore> = match config.backend {
        Backend::Mongodb => Box::new(MongoStore::connect(&config.mongodb)?),
        Backend::Sqlite => Box::new(SqliteStore::open(&config.sqlite_path()?)?),
    };
    Ok(store)
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn insert(&self, collection: &str, record: Record) -> Result<()> {
        (**self).insert(collection, record)
    }

    fn find(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<Record>> {
        (**self).find(collection, filter)
    }

    fn find_first(&self, collection: &str, filter: &Filter) -> Result<Option<Record>> {
        (**self).find_first(collection, filter)
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        (**self).delete_one(collection, filter)
    }

    fn find_sorted(&self, collection: &str, sort: &Sort) -> Result<Vec<Record>> {
        (**self).find_sorted(collection, sort)
    }
}
