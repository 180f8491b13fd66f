use serde::{Deserialize, Serialize};

use crate::models::comment::{Comment, NewComment};

#[derive(Debug, Deserialize)]
pub struct CreateCommentDTO {
    #[serde(default)]
    pub comment_text: Option<String>,
}

impl CreateCommentDTO {
    /// The trimmed text, or `None` when nothing is left to post.
    pub fn normalized_text(&self) -> Option<&str> {
        self.comment_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct CommentsOut {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
pub struct CreateCommentOut {
    pub success: bool,
    pub comment: NewComment,
}
