//! String-id facade over the store for request handlers.
//!
//! # Responsibility
//! - Validate identifier text before any storage access.
//! - Wire SQLite collections, the subscription graph and the cascade
//!   coordinator onto one store transaction per operation.
//! - Enforce ownership rules at creation time (owner exists, member type
//!   exists, one profile per user).
//!
//! # Invariants
//! - Malformed ids fail with `InvalidArgument` and never take the store lock.
//! - Every mutating operation is one transaction: it fully applies or
//!   leaves the store untouched.
//! - Subscribe direction: `actor_id` is the follower, `target_id` the user
//!   being followed.

use crate::db::Store;
use crate::model::id::{parse_record_id, EntityKind, UserId};
use crate::model::member_type::{MemberType, MemberTypeId, MemberTypePatch};
use crate::model::post::{NewPost, Post, PostPatch};
use crate::model::profile::{NewProfile, Profile, ProfilePatch};
use crate::model::user::{NewUser, User, UserDetailsPatch, UserPatch};
use crate::repo::member_type_collection::{MemberTypeFilter, SqliteMemberTypeCollection};
use crate::repo::post_collection::{PostFilter, SqlitePostCollection};
use crate::repo::profile_collection::{ProfileFilter, SqliteProfileCollection};
use crate::repo::user_collection::{SqliteUserCollection, UserFilter};
use crate::repo::{EntityCollection, LifecycleCollection};
use crate::service::cascade::CascadeCoordinator;
use crate::service::error::{CoreError, CoreResult};
use crate::service::subscription_graph::SubscriptionGraph;
use log::warn;
use rusqlite::Connection;

/// Use-case facade owning the process-local store.
pub struct RecordService {
    store: Store,
}

impl RecordService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Opens a fresh in-memory store and wraps it.
    pub fn open_in_memory() -> CoreResult<Self> {
        Ok(Self::new(Store::open_in_memory()?))
    }

    // Users

    pub fn list_users(&self) -> CoreResult<Vec<User>> {
        self.store
            .read(|conn| Ok(SqliteUserCollection::new(conn).find_many(None)?))
    }

    pub fn get_user(&self, raw_id: &str) -> CoreResult<User> {
        let id = parse_record_id(EntityKind::User, raw_id)?;
        self.store.read(|conn| require_user(conn, id))
    }

    pub fn create_user(&self, data: &NewUser) -> CoreResult<User> {
        self.store
            .write(|tx| Ok(SqliteUserCollection::new(tx).create(data)?))
    }

    pub fn change_user(&self, raw_id: &str, patch: UserDetailsPatch) -> CoreResult<User> {
        let id = parse_record_id(EntityKind::User, raw_id)?;
        let patch = UserPatch::from(patch);
        self.store
            .write(|tx| Ok(SqliteUserCollection::new(tx).change(id, &patch)?))
    }

    /// Deletes a user with its follow edges, profiles and posts.
    ///
    /// Returns the user as it was before deletion.
    pub fn delete_user_cascading(&self, raw_id: &str) -> CoreResult<User> {
        let id = parse_record_id(EntityKind::User, raw_id)?;
        self.store
            .write(|tx| {
                CascadeCoordinator::new(
                    SqliteUserCollection::new(tx),
                    SqliteProfileCollection::new(tx),
                    SqlitePostCollection::new(tx),
                )
                .delete_user(id)
            })
            .inspect_err(|err| {
                warn!(
                    "event=user_delete module=cascade status=error user_id={} error={}",
                    id, err
                );
            })
    }

    /// Makes `actor_id` follow `target_id`. Returns the updated actor.
    pub fn subscribe(&self, raw_actor_id: &str, raw_target_id: &str) -> CoreResult<User> {
        let actor_id = parse_record_id(EntityKind::User, raw_actor_id)?;
        let target_id = parse_record_id(EntityKind::User, raw_target_id)?;
        self.store.write(|tx| {
            SubscriptionGraph::new(SqliteUserCollection::new(tx)).add_edge(actor_id, target_id)
        })
    }

    /// Makes `actor_id` stop following `target_id`. Returns the updated actor.
    ///
    /// Fails with `PreconditionFailed` when no such edge exists.
    pub fn unsubscribe(&self, raw_actor_id: &str, raw_target_id: &str) -> CoreResult<User> {
        let actor_id = parse_record_id(EntityKind::User, raw_actor_id)?;
        let target_id = parse_record_id(EntityKind::User, raw_target_id)?;
        self.store.write(|tx| {
            SubscriptionGraph::new(SqliteUserCollection::new(tx))
                .remove_edge(actor_id, target_id)
        })
    }

    /// Lists the users following `raw_id`.
    pub fn subscribers_of(&self, raw_id: &str) -> CoreResult<Vec<User>> {
        let id = parse_record_id(EntityKind::User, raw_id)?;
        self.store.read(|conn| {
            require_user(conn, id)?;
            Ok(SqliteUserCollection::new(conn).find_many(Some(&UserFilter::SubscribedTo(id)))?)
        })
    }

    // Profiles

    pub fn list_profiles(&self) -> CoreResult<Vec<Profile>> {
        self.store
            .read(|conn| Ok(SqliteProfileCollection::new(conn).find_many(None)?))
    }

    pub fn get_profile(&self, raw_id: &str) -> CoreResult<Profile> {
        let id = parse_record_id(EntityKind::Profile, raw_id)?;
        self.store.read(|conn| {
            SqliteProfileCollection::new(conn)
                .find_one(&ProfileFilter::Id(id))?
                .ok_or_else(|| CoreError::not_found(EntityKind::Profile, id))
        })
    }

    /// Creates a profile for an existing user.
    ///
    /// # Errors
    /// - `NotFound` when the owner or the member type does not exist.
    /// - `PreconditionFailed` when the owner already has a profile.
    pub fn create_profile(&self, data: &NewProfile) -> CoreResult<Profile> {
        self.store.write(|tx| {
            require_user(tx, data.user_id)?;
            require_member_type(tx, data.member_type_id)?;
            let profiles = SqliteProfileCollection::new(tx);
            if profiles
                .find_one(&ProfileFilter::UserId(data.user_id))?
                .is_some()
            {
                return Err(CoreError::PreconditionFailed(format!(
                    "user {} already has a profile",
                    data.user_id
                )));
            }
            Ok(profiles.create(data)?)
        })
    }

    pub fn change_profile(&self, raw_id: &str, patch: &ProfilePatch) -> CoreResult<Profile> {
        let id = parse_record_id(EntityKind::Profile, raw_id)?;
        self.store.write(|tx| {
            if let Some(member_type_id) = patch.member_type_id {
                require_member_type(tx, member_type_id)?;
            }
            Ok(SqliteProfileCollection::new(tx).change(id, patch)?)
        })
    }

    pub fn delete_profile(&self, raw_id: &str) -> CoreResult<Profile> {
        let id = parse_record_id(EntityKind::Profile, raw_id)?;
        self.store
            .write(|tx| Ok(SqliteProfileCollection::new(tx).delete(id)?))
    }

    // Posts

    pub fn list_posts(&self) -> CoreResult<Vec<Post>> {
        self.store
            .read(|conn| Ok(SqlitePostCollection::new(conn).find_many(None)?))
    }

    pub fn posts_of_user(&self, raw_user_id: &str) -> CoreResult<Vec<Post>> {
        let user_id = parse_record_id(EntityKind::User, raw_user_id)?;
        self.store.read(|conn| {
            require_user(conn, user_id)?;
            Ok(SqlitePostCollection::new(conn).find_many(Some(&PostFilter::UserId(user_id)))?)
        })
    }

    pub fn get_post(&self, raw_id: &str) -> CoreResult<Post> {
        let id = parse_record_id(EntityKind::Post, raw_id)?;
        self.store.read(|conn| {
            SqlitePostCollection::new(conn)
                .find_one(&PostFilter::Id(id))?
                .ok_or_else(|| CoreError::not_found(EntityKind::Post, id))
        })
    }

    /// Creates a post for an existing user.
    pub fn create_post(&self, data: &NewPost) -> CoreResult<Post> {
        self.store.write(|tx| {
            require_user(tx, data.user_id)?;
            Ok(SqlitePostCollection::new(tx).create(data)?)
        })
    }

    pub fn change_post(&self, raw_id: &str, patch: &PostPatch) -> CoreResult<Post> {
        let id = parse_record_id(EntityKind::Post, raw_id)?;
        self.store
            .write(|tx| Ok(SqlitePostCollection::new(tx).change(id, patch)?))
    }

    pub fn delete_post(&self, raw_id: &str) -> CoreResult<Post> {
        let id = parse_record_id(EntityKind::Post, raw_id)?;
        self.store
            .write(|tx| Ok(SqlitePostCollection::new(tx).delete(id)?))
    }

    // Member types

    pub fn list_member_types(&self) -> CoreResult<Vec<MemberType>> {
        self.store
            .read(|conn| Ok(SqliteMemberTypeCollection::new(conn).find_many(None)?))
    }

    pub fn get_member_type(&self, raw_id: &str) -> CoreResult<MemberType> {
        let id = MemberTypeId::parse(raw_id)?;
        self.store.read(|conn| require_member_type(conn, id))
    }

    pub fn change_member_type(
        &self,
        raw_id: &str,
        patch: &MemberTypePatch,
    ) -> CoreResult<MemberType> {
        let id = MemberTypeId::parse(raw_id)?;
        self.store
            .write(|tx| Ok(SqliteMemberTypeCollection::new(tx).change(id, patch)?))
    }
}

fn require_user(conn: &Connection, id: UserId) -> CoreResult<User> {
    SqliteUserCollection::new(conn)
        .find_one(&UserFilter::Id(id))?
        .ok_or_else(|| CoreError::not_found(EntityKind::User, id))
}

fn require_member_type(conn: &Connection, id: MemberTypeId) -> CoreResult<MemberType> {
    SqliteMemberTypeCollection::new(conn)
        .find_one(&MemberTypeFilter::Id(id))?
        .ok_or_else(|| CoreError::not_found(EntityKind::MemberType, id))
}
