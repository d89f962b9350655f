//! Post record. A post is owned by exactly one user and is removed together
//! with it.

use super::id::{PostId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(deserialize_with = "super::id::deserialize_user_id")]
    pub user_id: UserId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn apply(&self, post: &mut Post) {
        if let Some(value) = &self.title {
            post.title = value.clone();
        }
        if let Some(value) = &self.content {
            post.content = value.clone();
        }
    }
}
