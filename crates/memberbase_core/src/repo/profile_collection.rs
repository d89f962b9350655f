//! Profile collection over `profiles`.

use super::{parse_uuid, EntityCollection, LifecycleCollection, RepoError, RepoResult};
use crate::model::id::{EntityKind, ProfileId, UserId};
use crate::model::member_type::MemberTypeId;
use crate::model::profile::{NewProfile, Profile, ProfilePatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const PROFILE_SELECT_SQL: &str = "SELECT
    uuid,
    avatar,
    sex,
    birthday,
    country,
    street,
    city,
    member_type_id,
    user_uuid
FROM profiles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileFilter {
    Id(ProfileId),
    UserId(UserId),
    MemberTypeId(MemberTypeId),
}

/// SQLite-backed profile collection.
#[derive(Clone, Copy)]
pub struct SqliteProfileCollection<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileCollection<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load(&self, id: ProfileId) -> RepoResult<Profile> {
        self.find_one(&ProfileFilter::Id(id))?
            .ok_or_else(|| RepoError::not_found(EntityKind::Profile, id))
    }
}

impl EntityCollection for SqliteProfileCollection<'_> {
    type Record = Profile;
    type Id = ProfileId;
    type Filter = ProfileFilter;
    type Patch = ProfilePatch;

    fn find_many(&self, filter: Option<&ProfileFilter>) -> RepoResult<Vec<Profile>> {
        let mut sql = String::from(PROFILE_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        match filter {
            None => {}
            Some(ProfileFilter::Id(id)) => {
                sql.push_str(" WHERE uuid = ?");
                bind_values.push(Value::Text(id.to_string()));
            }
            Some(ProfileFilter::UserId(user_id)) => {
                sql.push_str(" WHERE user_uuid = ?");
                bind_values.push(Value::Text(user_id.to_string()));
            }
            Some(ProfileFilter::MemberTypeId(member_type_id)) => {
                sql.push_str(" WHERE member_type_id = ?");
                bind_values.push(Value::Text(member_type_id.as_str().to_string()));
            }
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }

        Ok(profiles)
    }

    fn change(&self, id: ProfileId, patch: &ProfilePatch) -> RepoResult<Profile> {
        let mut profile = self.load(id)?;
        patch.apply(&mut profile);

        self.conn.execute(
            "UPDATE profiles
             SET
                avatar = ?2,
                sex = ?3,
                birthday = ?4,
                country = ?5,
                street = ?6,
                city = ?7,
                member_type_id = ?8
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                profile.avatar.as_str(),
                profile.sex.as_str(),
                profile.birthday,
                profile.country.as_str(),
                profile.street.as_str(),
                profile.city.as_str(),
                profile.member_type_id.as_str(),
            ],
        )?;

        Ok(profile)
    }
}

impl LifecycleCollection for SqliteProfileCollection<'_> {
    type New = NewProfile;

    fn create(&self, data: &NewProfile) -> RepoResult<Profile> {
        let profile = Profile {
            id: Uuid::new_v4(),
            avatar: data.avatar.clone(),
            sex: data.sex.clone(),
            birthday: data.birthday,
            country: data.country.clone(),
            street: data.street.clone(),
            city: data.city.clone(),
            member_type_id: data.member_type_id,
            user_id: data.user_id,
        };

        self.conn.execute(
            "INSERT INTO profiles (
                uuid,
                avatar,
                sex,
                birthday,
                country,
                street,
                city,
                member_type_id,
                user_uuid
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                profile.id.to_string(),
                profile.avatar.as_str(),
                profile.sex.as_str(),
                profile.birthday,
                profile.country.as_str(),
                profile.street.as_str(),
                profile.city.as_str(),
                profile.member_type_id.as_str(),
                profile.user_id.to_string(),
            ],
        )?;

        Ok(profile)
    }

    fn delete(&self, id: ProfileId) -> RepoResult<Profile> {
        let snapshot = self.load(id)?;
        self.conn
            .execute("DELETE FROM profiles WHERE uuid = ?1;", [id.to_string()])?;
        Ok(snapshot)
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let member_type_text: String = row.get("member_type_id")?;
    let member_type_id = MemberTypeId::parse(&member_type_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid member type `{member_type_text}` in profiles.member_type_id"
        ))
    })?;

    Ok(Profile {
        id: parse_uuid(&uuid_text, "profiles.uuid")?,
        avatar: row.get("avatar")?,
        sex: row.get("sex")?,
        birthday: row.get("birthday")?,
        country: row.get("country")?,
        street: row.get("street")?,
        city: row.get("city")?,
        member_type_id,
        user_id: parse_uuid(&user_text, "profiles.user_uuid")?,
    })
}
