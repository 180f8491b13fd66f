use serde::Serialize;
use tokio_postgres::Row;

/// Served in place of a missing avatar.
pub const DEFAULT_AVATAR_URL: &str = "/static/images/Default_pfp.jpg";

/// Public URL prefix for stored avatars.
pub const AVATAR_URL_PREFIX: &str = "/static/uploads";

/// A user as shown on a profile page, with derived social counts.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub user_id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub posts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
}

impl UserProfile {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            full_name: row.try_get("full_name")?,
            avatar_url: avatar_or_default(row.try_get("avatar_url")?),
            bio: row.try_get("bio")?,
            posts_count: row.try_get("posts_count")?,
            followers_count: row.try_get("followers_count")?,
            following_count: row.try_get("following_count")?,
            is_following: row.try_get("is_following")?,
        })
    }
}

/// Null or blank avatars fall back to the placeholder image.
pub fn avatar_or_default(avatar_url: Option<String>) -> String {
    avatar_url
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string())
}
