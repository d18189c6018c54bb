//! Database module: storage handle, schema and the two stores built on it.
//!
//! Layout:
//! - `sqlite.rs`: the process-wide pool and schema bootstrap
//! - `schema.rs`: SQL DDL for initializing the database
//! - `models.rs`: Rust structs mirroring DB rows
//! - `credentials.rs`: username/password store
//! - `history.rs`: append-only analysis log

pub mod credentials;
pub mod history;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use credentials::CredentialStore;
pub use history::HistoryStore;
pub use models::{DbUser, HistoryRecord};
pub use schema::SQLITE_INIT;
pub use sqlite::{Database, SqlitePool};
