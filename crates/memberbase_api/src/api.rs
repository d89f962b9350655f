//! Route-level API for users, posts, profiles and member types.
//!
//! # Responsibility
//! - Expose one handler per route of the record service.
//! - Decode JSON bodies and encode results into an `ApiResponse`.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an error envelope.
//! - Path ids are passed through as text and validated by the core.
//! - `/:id/subscribeTo` and `/:id/unsubscribeFrom` treat the path id as
//!   the follower and `userId` in the body as the followed user.

use crate::response::{decode_body, ApiResponse};
use log::{debug, info, warn};
use memberbase_core::{
    core_version as core_version_inner, ping as ping_inner, CoreResult, MemberTypePatch, NewPost,
    NewProfile, NewUser, PostPatch, ProfilePatch, RecordService, UserDetailsPatch,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the subscribe and unsubscribe routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubscribeBody {
    pub user_id: String,
}

/// Handler set bound to one record service.
pub struct MemberbaseApi {
    service: RecordService,
}

impl MemberbaseApi {
    pub fn new(service: RecordService) -> Self {
        Self { service }
    }

    /// Opens a fresh in-memory store.
    pub fn open_in_memory() -> CoreResult<Self> {
        RecordService::open_in_memory().map(Self::new)
    }

    pub fn ping(&self) -> String {
        ping_inner().to_owned()
    }

    pub fn core_version(&self) -> String {
        core_version_inner().to_owned()
    }

    // GET /users
    pub fn users_list(&self) -> ApiResponse {
        finish("users_list", self.service.list_users())
    }

    // GET /users/:id
    pub fn users_get(&self, id: &str) -> ApiResponse {
        finish("users_get", self.service.get_user(id))
    }

    // POST /users
    pub fn users_create(&self, body: Value) -> ApiResponse {
        let result =
            decode_body::<NewUser>(body).and_then(|data| self.service.create_user(&data));
        finish("users_create", result)
    }

    // PATCH /users/:id
    pub fn users_change(&self, id: &str, body: Value) -> ApiResponse {
        let result = decode_body::<UserDetailsPatch>(body)
            .and_then(|patch| self.service.change_user(id, patch));
        finish("users_change", result)
    }

    // DELETE /users/:id
    pub fn users_delete(&self, id: &str) -> ApiResponse {
        finish("users_delete", self.service.delete_user_cascading(id))
    }

    // POST /users/:id/subscribeTo
    pub fn users_subscribe_to(&self, id: &str, body: Value) -> ApiResponse {
        let result = decode_body::<SubscribeBody>(body)
            .and_then(|body| self.service.subscribe(id, &body.user_id));
        finish("users_subscribe_to", result)
    }

    // POST /users/:id/unsubscribeFrom
    pub fn users_unsubscribe_from(&self, id: &str, body: Value) -> ApiResponse {
        let result = decode_body::<SubscribeBody>(body)
            .and_then(|body| self.service.unsubscribe(id, &body.user_id));
        finish("users_unsubscribe_from", result)
    }

    // GET /users/:id/subscribers
    pub fn users_subscribers(&self, id: &str) -> ApiResponse {
        finish("users_subscribers", self.service.subscribers_of(id))
    }

    // GET /users/:id/posts
    pub fn users_posts(&self, id: &str) -> ApiResponse {
        finish("users_posts", self.service.posts_of_user(id))
    }

    // GET /posts
    pub fn posts_list(&self) -> ApiResponse {
        finish("posts_list", self.service.list_posts())
    }

    pub fn posts_get(&self, id: &str) -> ApiResponse {
        finish("posts_get", self.service.get_post(id))
    }

    pub fn posts_create(&self, body: Value) -> ApiResponse {
        let result =
            decode_body::<NewPost>(body).and_then(|data| self.service.create_post(&data));
        finish("posts_create", result)
    }

    pub fn posts_change(&self, id: &str, body: Value) -> ApiResponse {
        let result = decode_body::<PostPatch>(body)
            .and_then(|patch| self.service.change_post(id, &patch));
        finish("posts_change", result)
    }

    pub fn posts_delete(&self, id: &str) -> ApiResponse {
        finish("posts_delete", self.service.delete_post(id))
    }

    // GET /profiles
    pub fn profiles_list(&self) -> ApiResponse {
        finish("profiles_list", self.service.list_profiles())
    }

    pub fn profiles_get(&self, id: &str) -> ApiResponse {
        finish("profiles_get", self.service.get_profile(id))
    }

    pub fn profiles_create(&self, body: Value) -> ApiResponse {
        let result = decode_body::<NewProfile>(body)
            .and_then(|data| self.service.create_profile(&data));
        finish("profiles_create", result)
    }

    pub fn profiles_change(&self, id: &str, body: Value) -> ApiResponse {
        let result = decode_body::<ProfilePatch>(body)
            .and_then(|patch| self.service.change_profile(id, &patch));
        finish("profiles_change", result)
    }

    pub fn profiles_delete(&self, id: &str) -> ApiResponse {
        finish("profiles_delete", self.service.delete_profile(id))
    }

    // GET /member-types
    pub fn member_types_list(&self) -> ApiResponse {
        finish("member_types_list", self.service.list_member_types())
    }

    pub fn member_types_get(&self, id: &str) -> ApiResponse {
        finish("member_types_get", self.service.get_member_type(id))
    }

    pub fn member_types_change(&self, id: &str, body: Value) -> ApiResponse {
        let result = decode_body::<MemberTypePatch>(body)
            .and_then(|patch| self.service.change_member_type(id, &patch));
        finish("member_types_change", result)
    }
}

fn finish<T: Serialize>(route: &'static str, result: CoreResult<T>) -> ApiResponse {
    let response = ApiResponse::from_result(result);
    match response.status {
        200..=299 => debug!(
            "event=api_request module=api status=ok route={} http_status={}",
            route, response.status
        ),
        500..=599 => warn!(
            "event=api_request module=api status=error route={} http_status={}",
            route, response.status
        ),
        _ => info!(
            "event=api_request module=api status=rejected route={} http_status={}",
            route, response.status
        ),
    }
    response
}
