use chrono::NaiveDateTime;
use serde::Serialize;
use tokio_postgres::Row;

use crate::models::user::avatar_or_default;

/// A post on a profile page, annotated for the viewing user.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub post_id: i32,
    pub user_id: i32,
    pub image_url: Option<String>,
    pub caption: Option<String>,
    pub caption_with_tags: Option<String>,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub avatar_url: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub user_has_liked: bool,
}

impl PostSummary {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            post_id: row.try_get("post_id")?,
            user_id: row.try_get("user_id")?,
            image_url: row.try_get("image_url")?,
            caption: row.try_get("caption")?,
            caption_with_tags: row.try_get("caption_with_tags")?,
            created_at: row.try_get("created_at")?,
            username: row.try_get("username")?,
            avatar_url: avatar_or_default(row.try_get("avatar_url")?),
            like_count: row.try_get("like_count")?,
            comment_count: row.try_get("comment_count")?,
            user_has_liked: row.try_get("user_has_liked")?,
        })
    }
}
