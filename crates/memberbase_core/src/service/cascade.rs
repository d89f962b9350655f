//! User deletion with cascade over follow edges, profiles and posts.
//!
//! # Responsibility
//! - Delete a user together with everything that depends on it.
//!
//! # Invariants
//! - Nothing is mutated when the user does not exist.
//! - After success no follower still lists the deleted user, and no profile
//!   or post owned by it remains.
//! - Every step works from a fresh scan, so re-running the cascade after a
//!   partial failure converges on the same end state.
//! - Callers that need all-or-nothing behaviour run it inside one
//!   transaction (`RecordService` does).

use crate::model::id::{EntityKind, PostId, ProfileId, UserId};
use crate::model::post::Post;
use crate::model::profile::Profile;
use crate::model::user::{User, UserPatch};
use crate::repo::post_collection::PostFilter;
use crate::repo::profile_collection::ProfileFilter;
use crate::repo::user_collection::UserFilter;
use crate::repo::LifecycleCollection;
use crate::service::error::{CoreError, CoreResult};
use crate::service::subscription_graph::SubscriptionGraph;
use log::info;
use std::time::Instant;

/// Coordinates a user delete across the user, profile and post collections.
pub struct CascadeCoordinator<U, P, Q> {
    users: U,
    profiles: P,
    posts: Q,
}

impl<U, P, Q> CascadeCoordinator<U, P, Q>
where
    U: LifecycleCollection<Record = User, Id = UserId, Filter = UserFilter, Patch = UserPatch>,
    P: LifecycleCollection<Record = Profile, Id = ProfileId, Filter = ProfileFilter>,
    Q: LifecycleCollection<Record = Post, Id = PostId, Filter = PostFilter>,
{
    pub fn new(users: U, profiles: P, posts: Q) -> Self {
        Self {
            users,
            profiles,
            posts,
        }
    }

    /// Deletes `user_id` and returns the user as it was before deletion.
    ///
    /// Order: detach followers, delete profiles, delete posts, delete user.
    ///
    /// # Errors
    /// - `NotFound` when the user does not exist; nothing is mutated.
    /// - Any collection failure from a later step is returned unchanged.
    pub fn delete_user(&self, user_id: UserId) -> CoreResult<User> {
        let started_at = Instant::now();
        let snapshot = self
            .users
            .find_one(&UserFilter::Id(user_id))?
            .ok_or_else(|| CoreError::not_found(EntityKind::User, user_id))?;

        let graph = SubscriptionGraph::new(&self.users);
        let followers = graph.inbound_edges(user_id)?;
        for follower_id in &followers {
            graph.remove_edge(*follower_id, user_id)?;
        }

        let profiles = self
            .profiles
            .find_many(Some(&ProfileFilter::UserId(user_id)))?;
        for profile in &profiles {
            self.profiles.delete(profile.id)?;
        }

        let posts = self.posts.find_many(Some(&PostFilter::UserId(user_id)))?;
        for post in &posts {
            self.posts.delete(post.id)?;
        }

        self.users.delete(user_id)?;

        info!(
            "event=user_delete module=cascade status=ok user_id={} followers_detached={} profiles_deleted={} posts_deleted={} duration_ms={}",
            user_id,
            followers.len(),
            profiles.len(),
            posts.len(),
            started_at.elapsed().as_millis()
        );
        Ok(snapshot)
    }
}
