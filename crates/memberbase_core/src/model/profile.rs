//! Profile record. A profile is owned by exactly one user and is removed
//! together with it.

use super::id::{ProfileId, UserId};
use super::member_type::MemberTypeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub avatar: String,
    pub sex: String,
    /// Unix epoch milliseconds.
    pub birthday: i64,
    pub country: String,
    pub street: String,
    pub city: String,
    pub member_type_id: MemberTypeId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProfile {
    pub avatar: String,
    pub sex: String,
    pub birthday: i64,
    pub country: String,
    pub street: String,
    pub city: String,
    pub member_type_id: MemberTypeId,
    #[serde(deserialize_with = "super::id::deserialize_user_id")]
    pub user_id: UserId,
}

/// Ownership (`user_id`) is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    pub avatar: Option<String>,
    pub sex: Option<String>,
    pub birthday: Option<i64>,
    pub country: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub member_type_id: Option<MemberTypeId>,
}

impl ProfilePatch {
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(value) = &self.avatar {
            profile.avatar = value.clone();
        }
        if let Some(value) = &self.sex {
            profile.sex = value.clone();
        }
        if let Some(value) = self.birthday {
            profile.birthday = value;
        }
        if let Some(value) = &self.country {
            profile.country = value.clone();
        }
        if let Some(value) = &self.street {
            profile.street = value.clone();
        }
        if let Some(value) = &self.city {
            profile.city = value.clone();
        }
        if let Some(value) = self.member_type_id {
            profile.member_type_id = value;
        }
    }
}
