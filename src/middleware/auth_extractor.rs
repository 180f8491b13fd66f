// src/middleware/auth_extractor.rs
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried by the access token issued at login.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub exp: usize,
}

/// Verification material shared by every worker.
pub struct AuthKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

/// The caller of an `/api` route, resolved from `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<AuthenticatedUser, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let keys = req
        .app_data::<web::Data<AuthKeys>>()
        .ok_or_else(|| AppError::Internal("AuthKeys not registered".into()))?;

    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Token is missing".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid header format".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid auth header format".into()))?;

    match keys.verify(token) {
        Ok(claims) => {
            debug!("authenticated user {}", claims.user_id);
            Ok(AuthenticatedUser { user_id: claims.user_id })
        }
        Err(e) => {
            warn!("rejected token: {}", e);
            Err(AppError::Unauthorized("Invalid token".into()))
        }
    }
}
