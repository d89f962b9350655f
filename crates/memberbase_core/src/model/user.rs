//! User record and follow-set rules.
//!
//! # Invariants
//! - `subscribed_to_user_ids` never contains the user's own id.
//! - `subscribed_to_user_ids` holds each target at most once, in the order
//!   the edges were added.

use super::id::UserId;
use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Users this user follows.
    pub subscribed_to_user_ids: Vec<UserId>,
}

impl User {
    /// Checks follow-set invariants.
    ///
    /// # Errors
    /// - `SelfSubscription` when the user follows itself.
    /// - `DuplicateSubscription` when a target is listed twice.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.subscribed_to_user_ids.len());
        for target_id in &self.subscribed_to_user_ids {
            if *target_id == self.id {
                return Err(ValidationError::SelfSubscription { user_id: self.id });
            }
            if !seen.insert(*target_id) {
                return Err(ValidationError::DuplicateSubscription {
                    user_id: self.id,
                    target_id: *target_id,
                });
            }
        }
        Ok(())
    }

    pub fn is_subscribed_to(&self, target_id: UserId) -> bool {
        self.subscribed_to_user_ids.contains(&target_id)
    }
}

/// Input for creating a user. New users start with an empty follow-set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Collection-level patch. `None` leaves a field unchanged.
///
/// `subscribed_to_user_ids` replaces the whole follow-set; only the
/// subscription graph writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub subscribed_to_user_ids: Option<Vec<UserId>>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(value) = &self.first_name {
            user.first_name = value.clone();
        }
        if let Some(value) = &self.last_name {
            user.last_name = value.clone();
        }
        if let Some(value) = &self.email {
            user.email = value.clone();
        }
        if let Some(value) = &self.subscribed_to_user_ids {
            user.subscribed_to_user_ids = value.clone();
        }
    }
}

/// Caller-facing patch for user details. Follow edges are changed only
/// through subscribe/unsubscribe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserDetailsPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<UserDetailsPatch> for UserPatch {
    fn from(value: UserDetailsPatch) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            subscribed_to_user_ids: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserDetailsPatch, UserPatch};
    use crate::model::ValidationError;
    use serde_json::json;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subscribed_to_user_ids: Vec::new(),
        }
    }

    #[test]
    fn validate_rejects_self_subscription() {
        let mut record = user();
        record.subscribed_to_user_ids.push(record.id);
        assert_eq!(
            record.validate(),
            Err(ValidationError::SelfSubscription { user_id: record.id })
        );
    }

    #[test]
    fn validate_rejects_duplicate_targets() {
        let mut record = user();
        let target = Uuid::new_v4();
        record.subscribed_to_user_ids = vec![target, target];
        assert!(matches!(
            record.validate(),
            Err(ValidationError::DuplicateSubscription { target_id, .. }) if target_id == target
        ));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut record = user();
        let patch = UserPatch {
            email: Some("countess@example.com".to_string()),
            ..UserPatch::default()
        };
        patch.apply(&mut record);
        assert_eq!(record.email, "countess@example.com");
        assert_eq!(record.first_name, "Ada");
        assert!(record.subscribed_to_user_ids.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut record = user();
        let target = Uuid::new_v4();
        record.subscribed_to_user_ids.push(target);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["subscribedToUserIds"], json!([target.to_string()]));
    }

    #[test]
    fn details_patch_cannot_carry_follow_set() {
        let result = serde_json::from_value::<UserDetailsPatch>(json!({
            "email": "x@example.com",
            "subscribedToUserIds": []
        }));
        assert!(result.is_err());
    }
}
