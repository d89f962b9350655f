//! Error kinds surfaced by core operations.
//!
//! # Invariants
//! - Every error is scoped to the single operation that raised it.
//! - Semantic failures always carry the record kind and id they concern.

use crate::db::DbError;
use crate::model::id::{EntityKind, IdParseError};
use crate::repo::RepoError;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Outward classification of a core failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No such record.
    NotFound,
    /// Malformed identifier, malformed input or broken record rule.
    InvalidArgument,
    /// Operation not valid given the current relation state.
    PreconditionFailed,
    /// Unexpected storage failure.
    Internal,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("storage failure: {0}")]
    Storage(#[source] RepoError),
}

impl CoreError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            RepoError::Validation(err) => Self::InvalidArgument(err.to_string()),
            RepoError::Constraint(message) => Self::PreconditionFailed(message),
            other => Self::Storage(other),
        }
    }
}

impl From<IdParseError> for CoreError {
    fn from(value: IdParseError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(value: rusqlite::Error) -> Self {
        RepoError::from(value).into()
    }
}

impl From<DbError> for CoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreError, ErrorKind};
    use crate::model::id::EntityKind;
    use crate::model::ValidationError;
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn repo_errors_map_to_outward_kinds() {
        let id = Uuid::new_v4();
        let not_found: CoreError = RepoError::not_found(EntityKind::Post, id).into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(not_found.to_string().contains(&id.to_string()));

        let invalid: CoreError =
            RepoError::from(ValidationError::SelfSubscription { user_id: id }).into();
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);

        let constraint: CoreError = RepoError::Constraint("FOREIGN KEY".to_string()).into();
        assert_eq!(constraint.kind(), ErrorKind::PreconditionFailed);

        let internal: CoreError = RepoError::InvalidData("bad row".to_string()).into();
        assert_eq!(internal.kind(), ErrorKind::Internal);
    }
}
