/// Common test utilities for integration tests
///
/// Shared infrastructure for the DB-backed tests:
/// - test database setup (migrations run on connect)
/// - test user creation with a unique phone number
/// - session token generation
/// - request helpers
///
/// These tests need a running PostgreSQL reachable via `DATABASE_URL` and a
/// `SESSION_SECRET`; they are `#[ignore]`d so the default test run stays
/// hermetic.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use sqlx::PgPool;
use taskcal_api::app::{build_router, AppState};
use taskcal_api::config::Config;
use taskcal_shared::auth::session::{create_session_token, SessionClaims};
use taskcal_shared::models::user::{CreateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
    pub user: User,
    pub session_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user and session
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to the crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = create_test_user(&db, false).await?;
        let session_token = session_token_for(&user, &config);

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(Self {
            db,
            app,
            config,
            user,
            session_token,
        })
    }

    /// Authorization header value for the context's user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.session_token)
    }

    /// Sends a request through the router
    pub async fn call(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.app
            .clone()
            .call(request)
            .await
            .expect("Router call should not fail")
    }

    /// Deletes the context's user; tasks cascade
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Creates a user with a unique username and phone number
pub async fn create_test_user(db: &PgPool, is_admin: bool) -> anyhow::Result<User> {
    let suffix = Uuid::new_v4().as_u128() % 10_000_000_000;
    let mut user = User::create(
        db,
        CreateUser {
            username: format!("test-user-{}", Uuid::new_v4()),
            phone_number: format!("1{:010}", suffix),
            password_hash: taskcal_shared::auth::password::hash_password("t3st!pass")?,
        },
    )
    .await?;

    if is_admin {
        sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
            .bind(user.id)
            .execute(db)
            .await?;
        user.is_admin = true;
    }

    Ok(user)
}

/// Issues a session token for a user
pub fn session_token_for(user: &User, config: &Config) -> String {
    let claims = SessionClaims::new(user.id, user.is_admin);
    create_session_token(&claims, &config.session.secret).expect("Token creation should succeed")
}

/// Parses a JSON response body
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");
    serde_json::from_slice(&body).expect("Body should be JSON")
}
