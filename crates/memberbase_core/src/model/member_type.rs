//! Member type records. The set of member types is fixed and seeded by
//! migrations; records can be read and patched but never created or deleted.

use super::id::{EntityKind, IdParseError};
use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const MAX_DISCOUNT_PERCENT: f64 = 100.0;

/// Fixed member type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberTypeId {
    Basic,
    Business,
}

impl MemberTypeId {
    pub const ALL: [Self; 2] = [Self::Basic, Self::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Business => "business",
        }
    }

    /// Parses the textual id. Matching is exact; `"Basic"` is rejected.
    pub fn parse(raw: &str) -> Result<Self, IdParseError> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == raw)
            .ok_or_else(|| IdParseError {
                kind: EntityKind::MemberType,
                value: raw.to_string(),
            })
    }
}

impl Display for MemberTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberType {
    pub id: MemberTypeId,
    /// Discount percentage in `0..=100`.
    pub discount: f64,
    pub month_posts_limit: i64,
}

impl MemberType {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=MAX_DISCOUNT_PERCENT).contains(&self.discount) {
            return Err(ValidationError::OutOfRange {
                entity: EntityKind::MemberType,
                field: "discount",
                reason: "must be within 0..=100",
            });
        }
        if self.month_posts_limit < 0 {
            return Err(ValidationError::OutOfRange {
                entity: EntityKind::MemberType,
                field: "monthPostsLimit",
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemberTypePatch {
    pub discount: Option<f64>,
    pub month_posts_limit: Option<i64>,
}

impl MemberTypePatch {
    pub fn apply(&self, member_type: &mut MemberType) {
        if let Some(value) = self.discount {
            member_type.discount = value;
        }
        if let Some(value) = self.month_posts_limit {
            member_type.month_posts_limit = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemberType, MemberTypeId};

    #[test]
    fn parse_is_exact() {
        assert_eq!(MemberTypeId::parse("basic").unwrap(), MemberTypeId::Basic);
        assert_eq!(
            MemberTypeId::parse("business").unwrap(),
            MemberTypeId::Business
        );
        assert!(MemberTypeId::parse("Basic").is_err());
        assert!(MemberTypeId::parse("premium").is_err());
    }

    #[test]
    fn validate_bounds_discount_and_limit() {
        let mut member_type = MemberType {
            id: MemberTypeId::Basic,
            discount: 120.0,
            month_posts_limit: 20,
        };
        assert!(member_type.validate().is_err());
        member_type.discount = 7.5;
        assert!(member_type.validate().is_ok());
        member_type.month_posts_limit = -1;
        assert!(member_type.validate().is_err());
    }
}
