// src/repositories/user_repository.rs
use tokio_postgres::GenericClient;

use crate::models::post::PostSummary;
use crate::models::user::UserProfile;

pub struct UserRepository;

impl UserRepository {
    /// Looks a user up by name; `is_following` is evaluated for `viewer_id`.
    pub async fn find_profile<C: GenericClient>(
        client: &C,
        viewer_id: i32,
        username: &str,
    ) -> Result<Option<UserProfile>, tokio_postgres::Error> {
        let row = client
            .query_opt(
                "SELECT
                    u.user_id,
                    u.username,
                    u.full_name,
                    u.avatar_url,
                    u.bio,
                    (SELECT COUNT(*) FROM posts WHERE user_id = u.user_id) AS posts_count,
                    (SELECT COUNT(*) FROM followers WHERE followed_user_id = u.user_id) AS followers_count,
                    (SELECT COUNT(*) FROM followers WHERE follower_user_id = u.user_id) AS following_count,
                    EXISTS(
                        SELECT 1 FROM followers
                        WHERE follower_user_id = $1
                          AND followed_user_id = u.user_id
                    ) AS is_following
                 FROM users u
                 WHERE u.username = $2",
                &[&viewer_id, &username],
            )
            .await?;

        row.as_ref().map(UserProfile::from_row).transpose()
    }

    /// Posts owned by `owner_id`, newest first, with counts and the viewer's like flag.
    pub async fn list_posts<C: GenericClient>(
        client: &C,
        viewer_id: i32,
        owner_id: i32,
    ) -> Result<Vec<PostSummary>, tokio_postgres::Error> {
        let rows = client
            .query(
                "SELECT p.post_id, p.user_id, p.image_url, p.caption, p.caption_with_tags,
                        p.created_at, u.username, u.avatar_url,
                        COUNT(DISTINCT l.like_id) AS like_count,
                        COUNT(DISTINCT c.comment_id) AS comment_count,
                        EXISTS(
                            SELECT 1 FROM likes
                            WHERE post_id = p.post_id
                              AND user_id = $1
                        ) AS user_has_liked
                 FROM posts p
                 JOIN users u ON p.user_id = u.user_id
                 LEFT JOIN likes l ON p.post_id = l.post_id
                 LEFT JOIN comments c ON p.post_id = c.post_id
                 WHERE p.user_id = $2
                 GROUP BY p.post_id, u.username, u.avatar_url
                 ORDER BY p.created_at DESC, p.post_id DESC",
                &[&viewer_id, &owner_id],
            )
            .await?;

        rows.iter().map(PostSummary::from_row).collect()
    }

    pub async fn update_avatar<C: GenericClient>(
        client: &C,
        user_id: i32,
        avatar_url: &str,
    ) -> Result<u64, tokio_postgres::Error> {
        client
            .execute(
                "UPDATE users SET avatar_url = $1 WHERE user_id = $2",
                &[&avatar_url, &user_id],
            )
            .await
    }

    pub async fn update_full_name<C: GenericClient>(
        client: &C,
        user_id: i32,
        full_name: &str,
    ) -> Result<u64, tokio_postgres::Error> {
        client
            .execute(
                "UPDATE users SET full_name = $1 WHERE user_id = $2",
                &[&full_name, &user_id],
            )
            .await
    }
}
