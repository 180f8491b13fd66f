// src/handlers/comment_handlers.rs
use actix_web::{get, post, web, HttpResponse};
use log::{info, warn};

use crate::dtos::comment_dtos::{CommentsOut, CreateCommentDTO, CreateCommentOut};
use crate::error::{AppError, AppResult};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::comment_repository::CommentRepository;
use crate::AppState;

/// GET /api/post/{post_id}
/// Comments on a post, newest first
#[get("/post/{post_id}")]
pub async fn list_comments(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let client = state.pg_pool.get().await?;

    let comments = CommentRepository::list_for_post(&**client, post_id).await?;
    Ok(HttpResponse::Ok().json(CommentsOut { comments }))
}

/// POST /api/post/{post_id}
/// Adds a comment from the caller
#[post("/post/{post_id}")]
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i32>,
    body: web::Json<CreateCommentDTO>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let text = body
        .normalized_text()
        .ok_or_else(|| AppError::BadRequest("Comment cannot be empty".into()))?;

    let mut client = state.pg_pool.get().await?;
    let tx = client.transaction().await?;

    let comment = match CommentRepository::insert(&*tx, post_id, user.user_id, text).await {
        Ok(comment) => comment,
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                warn!("rollback after failed comment insert also failed: {}", rb);
            }
            return Err(e.into());
        }
    };
    tx.commit().await?;

    info!("user {} commented on post {} (comment {})", user.user_id, post_id, comment.comment_id);
    Ok(HttpResponse::Ok().json(CreateCommentOut {
        success: true,
        comment,
    }))
}
