// src/repositories/comment_repository.rs
use tokio_postgres::GenericClient;

use crate::models::comment::{Comment, NewComment};

pub struct CommentRepository;

impl CommentRepository {
    /// Every comment on a post, newest first, with author name and avatar.
    pub async fn list_for_post<C: GenericClient>(
        client: &C,
        post_id: i32,
    ) -> Result<Vec<Comment>, tokio_postgres::Error> {
        let rows = client
            .query(
                "SELECT c.comment_id, c.post_id, c.user_id, c.comment_text, c.created_at,
                        u.username, u.avatar_url
                 FROM comments c
                 JOIN users u ON c.user_id = u.user_id
                 WHERE c.post_id = $1
                 ORDER BY c.created_at DESC, c.comment_id DESC",
                &[&post_id],
            )
            .await?;

        rows.iter().map(Comment::from_row).collect()
    }

    pub async fn insert<C: GenericClient>(
        client: &C,
        post_id: i32,
        user_id: i32,
        comment_text: &str,
    ) -> Result<NewComment, tokio_postgres::Error> {
        let row = client
            .query_one(
                "INSERT INTO comments (post_id, user_id, comment_text)
                 VALUES ($1, $2, $3)
                 RETURNING comment_id, created_at",
                &[&post_id, &user_id, &comment_text],
            )
            .await?;

        Ok(NewComment {
            comment_id: row.try_get("comment_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
