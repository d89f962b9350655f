//! Post collection over `posts`.

use super::{parse_uuid, EntityCollection, LifecycleCollection, RepoError, RepoResult};
use crate::model::id::{EntityKind, PostId, UserId};
use crate::model::post::{NewPost, Post, PostPatch};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const POST_SELECT_SQL: &str = "SELECT uuid, title, content, user_uuid FROM posts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    Id(PostId),
    UserId(UserId),
}

/// SQLite-backed post collection.
#[derive(Clone, Copy)]
pub struct SqlitePostCollection<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostCollection<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load(&self, id: PostId) -> RepoResult<Post> {
        self.find_one(&PostFilter::Id(id))?
            .ok_or_else(|| RepoError::not_found(EntityKind::Post, id))
    }
}

impl EntityCollection for SqlitePostCollection<'_> {
    type Record = Post;
    type Id = PostId;
    type Filter = PostFilter;
    type Patch = PostPatch;

    fn find_many(&self, filter: Option<&PostFilter>) -> RepoResult<Vec<Post>> {
        let mut sql = String::from(POST_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        match filter {
            None => {}
            Some(PostFilter::Id(id)) => {
                sql.push_str(" WHERE uuid = ?");
                bind_values.push(Value::Text(id.to_string()));
            }
            Some(PostFilter::UserId(user_id)) => {
                sql.push_str(" WHERE user_uuid = ?");
                bind_values.push(Value::Text(user_id.to_string()));
            }
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn change(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        let mut post = self.load(id)?;
        patch.apply(&mut post);

        self.conn.execute(
            "UPDATE posts SET title = ?2, content = ?3 WHERE uuid = ?1;",
            params![id.to_string(), post.title.as_str(), post.content.as_str()],
        )?;

        Ok(post)
    }
}

impl LifecycleCollection for SqlitePostCollection<'_> {
    type New = NewPost;

    fn create(&self, data: &NewPost) -> RepoResult<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            content: data.content.clone(),
            user_id: data.user_id,
        };

        self.conn.execute(
            "INSERT INTO posts (uuid, title, content, user_uuid) VALUES (?1, ?2, ?3, ?4);",
            params![
                post.id.to_string(),
                post.title.as_str(),
                post.content.as_str(),
                post.user_id.to_string(),
            ],
        )?;

        Ok(post)
    }

    fn delete(&self, id: PostId) -> RepoResult<Post> {
        let snapshot = self.load(id)?;
        self.conn
            .execute("DELETE FROM posts WHERE uuid = ?1;", [id.to_string()])?;
        Ok(snapshot)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    Ok(Post {
        id: parse_uuid(&uuid_text, "posts.uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        user_id: parse_uuid(&user_text, "posts.user_uuid")?,
    })
}
