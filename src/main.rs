// src/main.rs
mod config;
mod dtos;
mod error;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;
#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer};
use deadpool_postgres::Pool;
use log::{error, info};
use serde_json::json;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::handlers::comment_handlers::{create_comment, list_comments};
use crate::handlers::profile_handlers::{get_user_by_username, update_profile};
use crate::middleware::auth_extractor::AuthKeys;
use crate::services::avatar_storage::AvatarStore;

fn mask_key(k: &str) -> String {
    let chars: Vec<char> = k.chars().collect();
    if chars.len() <= 8 { return "[REDACTED]".to_string(); }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[derive(Clone)]
pub struct AppState {
    pub pg_pool: Pool,
    pub avatars: AvatarStore,
    pub max_avatar_bytes: usize,
}

/// GET /health
#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Routes under `/api`, all of which require a bearer token.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    }))
    .service(
        web::scope("/api")
            .service(list_comments)        // GET  /api/post/{post_id}
            .service(create_comment)       // POST /api/post/{post_id}
            .service(get_user_by_username) // GET  /api/user/{username}
            .service(update_profile),      // PUT  /api/profile/update
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Postgres: {}@{}:{}/{}", config.pg_user, config.pg_host, config.pg_port, config.pg_db);
    info!("JWT secret: {}", mask_key(&config.jwt_secret));
    info!("Uploads go to {}", config.upload_folder.display());

    let pg_pool = match config::get_pg_pool(config.pg_config()) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create PG pool: {:#}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState {
        pg_pool,
        avatars: AvatarStore::new(config.upload_folder.clone()),
        max_avatar_bytes: config.max_avatar_bytes,
    });
    let auth_keys = web::Data::new(AuthKeys::from_secret(&config.jwt_secret));

    let allowed_origins = config.allowed_origins.clone();
    let bind_address = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(auth_keys.clone())
            .service(health)
            .configure(configure_api)
    })
    .bind(&bind_address)?
    .run()
    .await
}
