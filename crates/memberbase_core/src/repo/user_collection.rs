//! User collection over `users` + `user_subscriptions`.
//!
//! # Responsibility
//! - Store user details and the follow-set of every user.
//! - Answer set-membership lookups ("who follows X") through the
//!   `user_subscriptions` target index instead of a full scan.
//!
//! # Invariants
//! - `subscribed_to_user_ids` is projected from `user_subscriptions`
//!   ordered by `seq`; the table is the only place edges live.
//! - Replacing a follow-set rewrites it in one savepoint.
//! - Deleting a user with remaining followers, profiles or posts is refused
//!   by foreign keys and surfaces as `Constraint`.

use super::{
    parse_uuid, with_savepoint, EntityCollection, LifecycleCollection, RepoError, RepoResult,
};
use crate::model::id::{EntityKind, UserId};
use crate::model::user::{NewUser, User, UserPatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT
    uuid,
    first_name,
    last_name,
    email
FROM users";

/// Filters accepted by the user collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(UserId),
    Email(String),
    /// Users whose follow-set contains the given id.
    SubscribedTo(UserId),
}

/// SQLite-backed user collection.
#[derive(Clone, Copy)]
pub struct SqliteUserCollection<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserCollection<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load(&self, id: UserId) -> RepoResult<User> {
        self.find_one(&UserFilter::Id(id))?
            .ok_or_else(|| RepoError::not_found(EntityKind::User, id))
    }
}

impl EntityCollection for SqliteUserCollection<'_> {
    type Record = User;
    type Id = UserId;
    type Filter = UserFilter;
    type Patch = UserPatch;

    fn find_many(&self, filter: Option<&UserFilter>) -> RepoResult<Vec<User>> {
        let mut sql = String::from(USER_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        match filter {
            None => {}
            Some(UserFilter::Id(id)) => {
                sql.push_str(" WHERE uuid = ?");
                bind_values.push(Value::Text(id.to_string()));
            }
            Some(UserFilter::Email(email)) => {
                sql.push_str(" WHERE email = ?");
                bind_values.push(Value::Text(email.clone()));
            }
            Some(UserFilter::SubscribedTo(target_id)) => {
                sql.push_str(
                    " WHERE EXISTS (
                        SELECT 1
                        FROM user_subscriptions s
                        WHERE s.follower_uuid = users.uuid
                          AND s.target_uuid = ?
                    )",
                );
                bind_values.push(Value::Text(target_id.to_string()));
            }
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(self.conn, row)?);
        }

        Ok(users)
    }

    fn change(&self, id: UserId, patch: &UserPatch) -> RepoResult<User> {
        let mut user = self.load(id)?;
        patch.apply(&mut user);
        user.validate()?;

        with_savepoint(self.conn, "user_change", || {
            self.conn.execute(
                "UPDATE users
                 SET
                    first_name = ?2,
                    last_name = ?3,
                    email = ?4
                 WHERE uuid = ?1;",
                params![
                    id.to_string(),
                    user.first_name.as_str(),
                    user.last_name.as_str(),
                    user.email.as_str(),
                ],
            )?;

            if patch.subscribed_to_user_ids.is_some() {
                replace_subscriptions(self.conn, id, &user.subscribed_to_user_ids)?;
            }
            Ok(())
        })?;

        self.load(id)
    }
}

impl LifecycleCollection for SqliteUserCollection<'_> {
    type New = NewUser;

    fn create(&self, data: &NewUser) -> RepoResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            email: data.email.clone(),
            subscribed_to_user_ids: Vec::new(),
        };
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (uuid, first_name, last_name, email)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                user.id.to_string(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.email.as_str(),
            ],
        )?;

        Ok(user)
    }

    fn delete(&self, id: UserId) -> RepoResult<User> {
        let snapshot = self.load(id)?;
        with_savepoint(self.conn, "user_delete", || {
            self.conn.execute(
                "DELETE FROM user_subscriptions WHERE follower_uuid = ?1;",
                [id.to_string()],
            )?;
            self.conn
                .execute("DELETE FROM users WHERE uuid = ?1;", [id.to_string()])?;
            Ok(())
        })?;
        Ok(snapshot)
    }
}

fn replace_subscriptions(
    conn: &Connection,
    follower_id: UserId,
    targets: &[UserId],
) -> RepoResult<()> {
    let follower_text = follower_id.to_string();
    conn.execute(
        "DELETE FROM user_subscriptions WHERE follower_uuid = ?1;",
        [follower_text.as_str()],
    )?;
    for target_id in targets {
        conn.execute(
            "INSERT INTO user_subscriptions (follower_uuid, target_uuid) VALUES (?1, ?2);",
            params![follower_text.as_str(), target_id.to_string()],
        )?;
    }
    Ok(())
}

fn load_subscriptions(conn: &Connection, follower_uuid: &str) -> RepoResult<Vec<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT target_uuid
         FROM user_subscriptions
         WHERE follower_uuid = ?1
         ORDER BY seq ASC;",
    )?;
    let mut rows = stmt.query([follower_uuid])?;
    let mut targets = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        targets.push(parse_uuid(&value, "user_subscriptions.target_uuid")?);
    }
    Ok(targets)
}

fn parse_user_row(conn: &Connection, row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "users.uuid")?;
    let user = User {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        subscribed_to_user_ids: load_subscriptions(conn, &uuid_text)?,
    };
    user.validate()?;
    Ok(user)
}
