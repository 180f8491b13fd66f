// src/error.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;

pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("multipart error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                msg.as_str()
            }
            AppError::Multipart(e) => {
                warn!("rejected form data: {}", e);
                "Invalid form data"
            }
            // Internal detail stays in the log.
            other => {
                error!("request failed: {}", other);
                INTERNAL_MESSAGE
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            message,
        })
    }
}
