//! MongoDB backend.

use std::time::Duration;

use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{ClientOptions, ServerAddress};
use mongodb::sync::{Client, Collection as MongoCollection, Database};
use serde_json::Value;
use tracing::{debug, info};

use super::{Direction, DocumentStore, Filter, Record, Sort};
use crate::config::MongoConfig;
use crate::error::{DryCleaningError, Result};

/// Document store on a MongoDB database.
#[derive(Debug)]
pub struct MongoStore {
    /// Database holding the collections; shares the client's pool.
    database: Database,
}

impl MongoStore {
    /// Connect to the server in `config` and check it answers.
    ///
    /// The driver connects lazily, so a `ping` is sent to surface an
    /// unreachable server before any menu is shown.
    pub fn connect(config: &MongoConfig) -> Result<Self> {
        let mut options = ClientOptions::default();
        options.hosts = vec![ServerAddress::Tcp {
            host: config.host.clone(),
            port: Some(config.port),
        }];
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = Client::with_options(options)
            .map_err(|e| DryCleaningError::ConnectionFailure(e.to_string()))?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| {
                DryCleaningError::ConnectionFailure(format!(
                    "{}:{} did not answer: {e}",
                    config.host, config.port
                ))
            })?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connected to mongodb"
        );
        Ok(Self { database })
    }

    fn collection(&self, name: &str) -> MongoCollection<Document> {
        self.database.collection::<Document>(name)
    }
}

/// Convert a record into a BSON document, reading extended JSON (`$oid`, ...).
fn to_document(record: Record) -> Result<Document> {
    match Bson::try_from(Value::Object(record)) {
        Ok(Bson::Document(doc)) => Ok(doc),
        Ok(other) => Err(DryCleaningError::Conversion(format!(
            "record is not a document: {other}"
        ))),
        Err(e) => Err(DryCleaningError::Conversion(e.to_string())),
    }
}

/// Convert a stored document to relaxed extended JSON.
fn to_record(doc: Document) -> Result<Record> {
    match Bson::Document(doc).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(DryCleaningError::Conversion(format!(
            "document is not an object: {other}"
        ))),
    }
}

fn filter_document(filter: &Filter) -> Document {
    let mut doc = Document::new();
    doc.insert(filter.field.clone(), filter.value.clone());
    doc
}

fn sort_document(sort: &Sort) -> Document {
    let order = match sort.direction {
        Direction::Ascending => 1,
        Direction::Descending => -1,
    };
    let mut doc = Document::new();
    doc.insert(sort.field.clone(), order);
    doc
}

impl DocumentStore for MongoStore {
    fn insert(&self, collection: &str, record: Record) -> Result<()> {
        let result = self.collection(collection).insert_one(to_document(record)?).run()?;
        debug!(collection, id = %result.inserted_id, "inserted document");
        Ok(())
    }

    fn find(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<Record>> {
        debug!(collection, ?filter, "find");
        let filter = filter.map(filter_document).unwrap_or_default();
        self.collection(collection)
            .find(filter)
            .run()?
            .map(|doc| to_record(doc?))
            .collect()
    }

    fn find_first(&self, collection: &str, filter: &Filter) -> Result<Option<Record>> {
        debug!(collection, ?filter, "find first");
        self.collection(collection)
            .find_one(filter_document(filter))
            .run()?
            .map(to_record)
            .transpose()
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let result = self
            .collection(collection)
            .delete_one(filter_document(filter))
            .run()?;
        debug!(collection, ?filter, deleted = result.deleted_count, "delete one");
        Ok(result.deleted_count)
    }

    fn find_sorted(&self, collection: &str, sort: &Sort) -> Result<Vec<Record>> {
        debug!(collection, ?sort, "find sorted");
        self.collection(collection)
            .find(Document::new())
            .sort(sort_document(sort))
            .run()?
            .map(|doc| to_record(doc?))
            .collect()
    }
}
