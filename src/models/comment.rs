use chrono::NaiveDateTime;
use serde::Serialize;
use tokio_postgres::Row;

use crate::models::user::avatar_or_default;

/// A comment joined with its author's display fields.
#[derive(Debug, Serialize)]
pub struct Comment {
    pub comment_id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub comment_text: String,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub avatar_url: String,
}

impl Comment {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            comment_id: row.try_get("comment_id")?,
            post_id: row.try_get("post_id")?,
            user_id: row.try_get("user_id")?,
            comment_text: row.try_get("comment_text")?,
            created_at: row.try_get("created_at")?,
            username: row.try_get("username")?,
            avatar_url: avatar_or_default(row.try_get("avatar_url")?),
        })
    }
}

/// What the store hands back for a freshly inserted comment.
#[derive(Debug, Serialize)]
pub struct NewComment {
    pub comment_id: i32,
    pub created_at: NaiveDateTime,
}
