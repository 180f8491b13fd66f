// Fixtures for the database-backed repository tests.
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio::sync::OnceCell;
use tokio_postgres::{GenericClient, NoTls};

static SCHEMA: LazyLock<OnceCell<()>> = LazyLock::new(OnceCell::new);
static SEQ: AtomicU32 = AtomicU32::new(0);

/// Pool against `TEST_DATABASE_URL` with the schema applied.
pub async fn test_pool() -> Pool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pg_config = url
        .parse::<tokio_postgres::Config>()
        .expect("TEST_DATABASE_URL is not a valid postgres url");
    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    let pool = Pool::builder(manager)
        .max_size(4)
        .build()
        .expect("failed to create test pool");

    let pool_ref = &pool;
    SCHEMA
        .get_or_init(|| async move {
            let client = pool_ref.get().await.expect("test database unreachable");
            client
                .batch_execute(include_str!("../../migrations/001_init.sql"))
                .await
                .expect("failed to apply schema");
        })
        .await;

    pool
}

fn unique(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}_{}_{}", prefix, nanos, SEQ.fetch_add(1, Ordering::Relaxed))
}

pub async fn seed_user<C: GenericClient>(client: &C, prefix: &str, avatar_url: Option<&str>) -> i32 {
    let username = unique(prefix);
    let email = format!("{}@example.test", username);
    client
        .query_one(
            "INSERT INTO users (username, email, avatar_url) VALUES ($1, $2, $3) RETURNING user_id",
            &[&username, &email, &avatar_url],
        )
        .await
        .expect("seed user")
        .get(0)
}

pub async fn seed_post<C: GenericClient>(client: &C, owner: i32) -> i32 {
    client
        .query_one(
            "INSERT INTO posts (user_id, image_url, caption) VALUES ($1, '/static/uploads/p.jpg', 'hello') RETURNING post_id",
            &[&owner],
        )
        .await
        .expect("seed post")
        .get(0)
}

pub async fn seed_follow<C: GenericClient>(client: &C, follower: i32, followed: i32) {
    client
        .execute(
            "INSERT INTO followers (follower_user_id, followed_user_id) VALUES ($1, $2)",
            &[&follower, &followed],
        )
        .await
        .expect("seed follow");
}

pub async fn seed_like<C: GenericClient>(client: &C, user: i32, post: i32) {
    client
        .execute(
            "INSERT INTO likes (user_id, post_id) VALUES ($1, $2)",
            &[&user, &post],
        )
        .await
        .expect("seed like");
}

pub async fn username_of<C: GenericClient>(client: &C, user: i32) -> String {
    client
        .query_one("SELECT username FROM users WHERE user_id = $1", &[&user])
        .await
        .expect("user exists")
        .get(0)
}
