//! Dry-cleaning console.
//!
//! An interactive menu over six document collections (Customers, Orders,
//! Invoices, Services, Employees, Items) kept in MongoDB or in a local
//! SQLite file.
//!
//! ## Features
//!
//! - Display, add, delete, find by name and sort by field per collection
//! - Orders embed copies of Items looked up by name
//! - Scriptable sessions through the [`Console`] trait
//! - Pluggable stores through the [`DocumentStore`] trait

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod formatter;
pub mod forms;
pub mod registry;
pub mod session;
pub mod store;

pub use cli::Cli;
pub use config::{Backend, Config, ConfigOverrides};
pub use console::{Console, LineConsole, StdConsole};
pub use error::{DryCleaningError, Result};
pub use forms::NewRecord;
pub use registry::{Collection, CollectionChoice};
pub use session::{MenuState, Operation, Session};
pub use store::{DocumentStore, Filter, MongoStore, Record, Sort, SqliteStore};
