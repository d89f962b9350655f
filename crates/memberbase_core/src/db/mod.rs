//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure the in-memory SQLite working set.
//! - Apply schema migrations in deterministic order.
//! - Own the process-local `Store` that serializes every access.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write records before migrations succeed.
//! - Foreign keys are enforced on every connection handed out.

use thiserror::Error;

pub mod migrations;
mod open;
mod store;

pub use open::open_db_in_memory;
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap error.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
