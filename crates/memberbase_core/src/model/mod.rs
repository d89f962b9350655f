//! Record model for users, profiles, posts and member types.
//!
//! # Responsibility
//! - Define the canonical record shapes used by collections and services.
//! - Define create/patch inputs and per-record validation rules.
//!
//! # Invariants
//! - Users, profiles and posts are identified by stable UUIDs.
//! - Member types are identified by a fixed enumeration.
//! - A user never subscribes to itself and never holds duplicate edges.

pub mod id;
pub mod member_type;
pub mod post;
pub mod profile;
pub mod user;

use id::{EntityKind, UserId};
use thiserror::Error;

/// Record-level rule violation detected before persistence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("user {user_id} cannot subscribe to itself")]
    SelfSubscription { user_id: UserId },
    #[error("user {user_id} lists subscription target {target_id} more than once")]
    DuplicateSubscription { user_id: UserId, target_id: UserId },
    #[error("{entity}.{field} {reason}")]
    OutOfRange {
        entity: EntityKind,
        field: &'static str,
        reason: &'static str,
    },
}
