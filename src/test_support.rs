// Shared fixtures for handler tests.
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use deadpool_postgres::{Config, Pool};
use tempfile::TempDir;

use crate::middleware::auth_extractor::tests::{token_for, TEST_SECRET};
use crate::middleware::auth_extractor::AuthKeys;
use crate::services::avatar_storage::AvatarStore;
use crate::{config, configure_api, AppState};

pub const BOUNDARY: &str = "----snapgramTestBoundary";

/// Pool pointed at a closed port, so every checkout fails fast.
pub fn unreachable_pool() -> Pool {
    let mut cfg = Config::new();
    cfg.host = Some("127.0.0.1".into());
    cfg.port = Some(1);
    cfg.user = Some("test".into());
    cfg.dbname = Some("test".into());
    config::get_pg_pool(cfg).expect("pool config is valid")
}

/// State over `pool` with a private upload directory. Keep the `TempDir`
/// alive for as long as the test touches the directory.
pub fn state_with_pool(pool: Pool) -> (AppState, TempDir) {
    let uploads = TempDir::new().expect("create upload dir");
    let state = AppState {
        pg_pool: pool,
        avatars: AvatarStore::new(uploads.path()),
        max_avatar_bytes: 1024,
    };
    (state, uploads)
}

pub fn test_state() -> (AppState, TempDir) {
    state_with_pool(unreachable_pool())
}

pub fn test_app_with(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(AuthKeys::from_secret(TEST_SECRET)))
        .configure(configure_api)
}

/// App for tests that never write uploads; its upload directory is already gone.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let (state, _uploads) = test_state();
    test_app_with(state)
}

pub fn bearer(user_id: i32) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user_id, TEST_SECRET, 3600)))
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_put(uri: &str, parts: &[Part]) -> test::TestRequest {
    test::TestRequest::put()
        .uri(uri)
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(parts))
}

pub fn count_files(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}
