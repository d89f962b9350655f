//! Core record store for users, profiles, posts and member types.
//! This crate is the single source of truth for referential integrity
//! between users, their follow edges and the records they own.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::Store;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::id::{parse_record_id, EntityKind, IdParseError, PostId, ProfileId, UserId};
pub use model::member_type::{MemberType, MemberTypeId, MemberTypePatch};
pub use model::post::{NewPost, Post, PostPatch};
pub use model::profile::{NewProfile, Profile, ProfilePatch};
pub use model::user::{NewUser, User, UserDetailsPatch, UserPatch};
pub use model::ValidationError;
pub use repo::member_type_collection::{MemberTypeFilter, SqliteMemberTypeCollection};
pub use repo::post_collection::{PostFilter, SqlitePostCollection};
pub use repo::profile_collection::{ProfileFilter, SqliteProfileCollection};
pub use repo::user_collection::{SqliteUserCollection, UserFilter};
pub use repo::{EntityCollection, LifecycleCollection, RepoError, RepoResult};
pub use service::cascade::CascadeCoordinator;
pub use service::error::{CoreError, CoreResult, ErrorKind};
pub use service::record_service::RecordService;
pub use service::subscription_graph::SubscriptionGraph;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
