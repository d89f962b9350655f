//! Entity collections: keyed storage contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the generic collection contract shared by every record kind.
//! - Isolate SQL details from graph and cascade orchestration.
//!
//! # Invariants
//! - Write paths run model validation before SQL mutations.
//! - Multi-statement writes run under a savepoint, so a failed write leaves
//!   the collection unchanged.
//! - `find_many` without a filter returns records in insertion order.
//! - Semantic absence is reported as `NotFound`, never as a SQLite error.

use crate::db::DbError;
use crate::model::id::EntityKind;
use crate::model::ValidationError;
use log::warn;
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;
use uuid::Uuid;

pub mod member_type_collection;
pub mod post_collection;
pub mod profile_collection;
pub mod user_collection;

pub type RepoResult<T> = Result<T, RepoError>;

/// Collection-level error.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    /// A foreign-key, unique or check constraint refused the write.
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl RepoError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(err, message)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(message.unwrap_or_else(|| err.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}

/// Read and patch half of a keyed collection.
pub trait EntityCollection {
    type Record;
    type Id: Copy;
    type Filter;
    type Patch;

    /// Lists records matching `filter`, or every record when `None`.
    fn find_many(&self, filter: Option<&Self::Filter>) -> RepoResult<Vec<Self::Record>>;

    /// Returns the first record matching `filter`.
    fn find_one(&self, filter: &Self::Filter) -> RepoResult<Option<Self::Record>> {
        Ok(self.find_many(Some(filter))?.into_iter().next())
    }

    /// Merges `patch` into the record and returns the stored result.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    /// - `Validation` when the merged record breaks a model rule.
    fn change(&self, id: Self::Id, patch: &Self::Patch) -> RepoResult<Self::Record>;
}

/// Create and delete half of a keyed collection.
pub trait LifecycleCollection: EntityCollection {
    type New;

    /// Stores a new record under a freshly generated id.
    fn create(&self, data: &Self::New) -> RepoResult<Self::Record>;

    /// Removes the record and returns its last stored state.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    /// - `Constraint` when other records still reference it.
    fn delete(&self, id: Self::Id) -> RepoResult<Self::Record>;
}

impl<T: EntityCollection + ?Sized> EntityCollection for &T {
    type Record = T::Record;
    type Id = T::Id;
    type Filter = T::Filter;
    type Patch = T::Patch;

    fn find_many(&self, filter: Option<&Self::Filter>) -> RepoResult<Vec<Self::Record>> {
        (**self).find_many(filter)
    }

    fn find_one(&self, filter: &Self::Filter) -> RepoResult<Option<Self::Record>> {
        (**self).find_one(filter)
    }

    fn change(&self, id: Self::Id, patch: &Self::Patch) -> RepoResult<Self::Record> {
        (**self).change(id, patch)
    }
}

impl<T: LifecycleCollection + ?Sized> LifecycleCollection for &T {
    type New = T::New;

    fn create(&self, data: &Self::New) -> RepoResult<Self::Record> {
        (**self).create(data)
    }

    fn delete(&self, id: Self::Id) -> RepoResult<Self::Record> {
        (**self).delete(id)
    }
}

/// Runs `op` inside a named savepoint. Works both inside an outer
/// transaction and on a bare autocommit connection.
pub(crate) fn with_savepoint<T>(
    conn: &Connection,
    name: &'static str,
    op: impl FnOnce() -> RepoResult<T>,
) -> RepoResult<T> {
    conn.execute_batch(&format!("SAVEPOINT {name};"))?;
    match op() {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) =
                conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name};"))
            {
                warn!(
                    "event=savepoint_rollback module=repo status=error savepoint={} error={}",
                    name, rollback_err
                );
            }
            Err(err)
        }
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
