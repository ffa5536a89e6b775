//! Error types for the dry-cleaning console.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DryCleaningError>;

/// Everything that can go wrong while talking to the operator or the store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DryCleaningError {
    /// A menu answer that is not a number or is out of range.
    #[error("invalid menu choice: {0:?}")]
    InvalidMenuChoice(String),

    /// A name lookup that matched nothing.
    #[error("no document named {name:?} in {collection}")]
    LookupMiss {
        /// Collection that was searched.
        collection: String,
        /// Name that was looked up.
        name: String,
    },

    /// The backing store could not be reached at startup.
    #[error("cannot connect to the document store: {0}")]
    ConnectionFailure(String),

    /// A numeric field that did not parse.
    #[error("not a number: {0:?}")]
    InvalidNumber(String),

    /// Standard input reached end of file.
    #[error("input closed")]
    InputClosed,

    /// Bad or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A record that could not be converted to or from the store format.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Console I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// SQLite store failure.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// MongoDB store failure.
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    /// JSON encoding failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML config parse failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl DryCleaningError {
    /// Whether the command loop can carry on after this error.
    ///
    /// Store and conversion failures during an operation are reported and the
    /// operator stays at the same menu; console failures end the session.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InputClosed | Self::Io(_))
    }
}
