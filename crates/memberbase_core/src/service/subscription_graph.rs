//! Subscription graph over the user collection.
//!
//! # Responsibility
//! - Add and remove directed follow edges between users.
//! - Answer the inverse lookup "which users follow X".
//!
//! # Invariants
//! - Edge addition is idempotent.
//! - A user never follows itself; the request is rejected, not ignored.
//! - Removing an absent edge fails with `PreconditionFailed` on every path.
//! - Both endpoints must exist for any edge mutation.

use crate::model::id::{EntityKind, UserId};
use crate::model::user::{User, UserPatch};
use crate::repo::user_collection::UserFilter;
use crate::repo::EntityCollection;
use crate::service::error::{CoreError, CoreResult};
use log::{debug, info};

/// Graph operations layered on any user collection.
pub struct SubscriptionGraph<U> {
    users: U,
}

impl<U> SubscriptionGraph<U>
where
    U: EntityCollection<Record = User, Id = UserId, Filter = UserFilter, Patch = UserPatch>,
{
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Adds `target_id` to the follower's set and returns the follower.
    ///
    /// # Errors
    /// - `InvalidArgument` when `follower_id == target_id`.
    /// - `NotFound` when either user is missing.
    pub fn add_edge(&self, follower_id: UserId, target_id: UserId) -> CoreResult<User> {
        if follower_id == target_id {
            return Err(CoreError::InvalidArgument(format!(
                "user {follower_id} cannot subscribe to itself"
            )));
        }
        let follower = self.require_user(follower_id)?;
        self.require_user(target_id)?;

        if follower.is_subscribed_to(target_id) {
            debug!(
                "event=edge_add module=graph status=noop follower_id={} target_id={}",
                follower_id, target_id
            );
            return Ok(follower);
        }

        let mut targets = follower.subscribed_to_user_ids;
        targets.push(target_id);
        let updated = self.users.change(
            follower_id,
            &UserPatch {
                subscribed_to_user_ids: Some(targets),
                ..UserPatch::default()
            },
        )?;

        info!(
            "event=edge_add module=graph status=ok follower_id={} target_id={}",
            follower_id, target_id
        );
        Ok(updated)
    }

    /// Removes `target_id` from the follower's set and returns the follower.
    ///
    /// # Errors
    /// - `NotFound` when either user is missing.
    /// - `PreconditionFailed` when the follower does not follow the target.
    pub fn remove_edge(&self, follower_id: UserId, target_id: UserId) -> CoreResult<User> {
        let follower = self.require_user(follower_id)?;
        self.require_user(target_id)?;

        if !follower.is_subscribed_to(target_id) {
            return Err(CoreError::PreconditionFailed(format!(
                "user {follower_id} is not subscribed to user {target_id}"
            )));
        }

        let mut targets = follower.subscribed_to_user_ids;
        targets.retain(|id| *id != target_id);
        let updated = self.users.change(
            follower_id,
            &UserPatch {
                subscribed_to_user_ids: Some(targets),
                ..UserPatch::default()
            },
        )?;

        info!(
            "event=edge_remove module=graph status=ok follower_id={} target_id={}",
            follower_id, target_id
        );
        Ok(updated)
    }

    /// Returns the ids of every user whose set contains `target_id`, in
    /// user insertion order. An unknown target simply has no followers.
    pub fn inbound_edges(&self, target_id: UserId) -> CoreResult<Vec<UserId>> {
        let followers = self
            .users
            .find_many(Some(&UserFilter::SubscribedTo(target_id)))?;
        Ok(followers.into_iter().map(|user| user.id).collect())
    }

    fn require_user(&self, id: UserId) -> CoreResult<User> {
        self.users
            .find_one(&UserFilter::Id(id))?
            .ok_or_else(|| CoreError::not_found(EntityKind::User, id))
    }
}
