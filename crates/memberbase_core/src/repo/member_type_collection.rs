//! Member type collection over the seeded `member_types` table.
//!
//! Only the read/patch half of the collection contract is implemented:
//! member types are a fixed enumeration.

use super::{EntityCollection, RepoError, RepoResult};
use crate::model::id::EntityKind;
use crate::model::member_type::{MemberType, MemberTypeId, MemberTypePatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberTypeFilter {
    Id(MemberTypeId),
}

#[derive(Clone, Copy)]
pub struct SqliteMemberTypeCollection<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberTypeCollection<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EntityCollection for SqliteMemberTypeCollection<'_> {
    type Record = MemberType;
    type Id = MemberTypeId;
    type Filter = MemberTypeFilter;
    type Patch = MemberTypePatch;

    fn find_many(&self, filter: Option<&MemberTypeFilter>) -> RepoResult<Vec<MemberType>> {
        let mut sql = String::from("SELECT id, discount, month_posts_limit FROM member_types");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(MemberTypeFilter::Id(id)) = filter {
            sql.push_str(" WHERE id = ?");
            bind_values.push(Value::Text(id.as_str().to_string()));
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut member_types = Vec::new();
        while let Some(row) = rows.next()? {
            member_types.push(parse_member_type_row(row)?);
        }
        Ok(member_types)
    }

    fn change(&self, id: MemberTypeId, patch: &MemberTypePatch) -> RepoResult<MemberType> {
        let mut member_type = self
            .find_one(&MemberTypeFilter::Id(id))?
            .ok_or_else(|| RepoError::not_found(EntityKind::MemberType, id))?;
        patch.apply(&mut member_type);
        member_type.validate()?;

        self.conn.execute(
            "UPDATE member_types SET discount = ?2, month_posts_limit = ?3 WHERE id = ?1;",
            params![
                id.as_str(),
                member_type.discount,
                member_type.month_posts_limit
            ],
        )?;

        Ok(member_type)
    }
}

fn parse_member_type_row(row: &Row<'_>) -> RepoResult<MemberType> {
    let id_text: String = row.get("id")?;
    let id = MemberTypeId::parse(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid member type `{id_text}` in member_types.id"))
    })?;
    Ok(MemberType {
        id,
        discount: row.get("discount")?,
        month_posts_limit: row.get("month_posts_limit")?,
    })
}
