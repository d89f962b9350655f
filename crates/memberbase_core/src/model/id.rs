//! Record identifiers and identifier parsing.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier of a user record.
pub type UserId = Uuid;
/// Stable identifier of a profile record.
pub type ProfileId = Uuid;
/// Stable identifier of a post record.
pub type PostId = Uuid;

const HYPHENATED_UUID_LEN: usize = 36;

/// Record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Profile,
    Post,
    MemberType,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Profile => "profile",
            Self::Post => "post",
            Self::MemberType => "member_type",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier text that does not match the expected format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind} id `{value}`")]
pub struct IdParseError {
    pub kind: EntityKind,
    pub value: String,
}

/// Parses a record id in canonical hyphenated UUID form.
///
/// Other UUID spellings (simple, braced, urn) are rejected so that every id
/// crossing the core boundary has exactly one textual form.
pub fn parse_record_id(kind: EntityKind, raw: &str) -> Result<Uuid, IdParseError> {
    let malformed = || IdParseError {
        kind,
        value: raw.to_string(),
    };
    if raw.len() != HYPHENATED_UUID_LEN {
        return Err(malformed());
    }
    Uuid::parse_str(raw).map_err(|_| malformed())
}

/// Deserializes a user id held in a request body with the same rules as
/// `parse_record_id`.
pub fn deserialize_user_id<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_record_id(EntityKind::User, &raw).map_err(serde::de::Error::custom)
}
