use std::env;
use std::path::PathBuf;
use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, Runtime, PoolConfig};
use tokio_postgres::NoTls;

const DEFAULT_UPLOAD_FOLDER: &str = "static/uploads";
const DEFAULT_MAX_AVATAR_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_POOL_MAX: usize = 16;

/// Everything the server reads from the environment at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub pg_host: String,
    pub pg_port: u16,
    pub pg_user: String,
    pub pg_pass: Option<String>,
    pub pg_db: String,
    pub pg_pool_max: usize,
    pub jwt_secret: String,
    pub upload_folder: PathBuf,
    pub max_avatar_bytes: usize,
    pub allowed_origins: Vec<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            pg_host: env::var("PG_HOST").context("PG_HOST not set")?,
            pg_port: parse_or("PG_PORT", 5432)?,
            pg_user: env::var("PG_USER").context("PG_USER not set")?,
            pg_pass: env::var("PG_PASS").ok(),
            pg_db: env::var("PG_DB").context("PG_DB not set")?,
            pg_pool_max: parse_or("PG_POOL_MAX", DEFAULT_POOL_MAX)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET not set")?,
            upload_folder: env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_FOLDER)),
            max_avatar_bytes: parse_or("MAX_AVATAR_BYTES", DEFAULT_MAX_AVATAR_BYTES)?,
            allowed_origins: split_origins(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:8081,http://127.0.0.1:8081".into()),
            ),
            port: parse_or("PORT", 8080)?,
        })
    }

    pub fn pg_config(&self) -> Config {
        let mut cfg = Config::new();
        cfg.host = Some(self.pg_host.clone());
        cfg.port = Some(self.pg_port);
        cfg.user = Some(self.pg_user.clone());
        cfg.password = self.pg_pass.clone();
        cfg.dbname = Some(self.pg_db.clone());
        cfg.pool = Some(PoolConfig::new(self.pg_pool_max));
        cfg
    }
}

/// Builds the pool without connecting; connections are opened lazily on
/// first checkout.
pub fn get_pg_pool(cfg: Config) -> Result<Pool> {
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
       .context("failed to create postgres pool")
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
