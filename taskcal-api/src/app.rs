/// Application state and router builder
///
/// Defines the shared application state, the authenticated session context,
/// and the function that assembles the Axum router with all routes and
/// middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register        # Public
///     │   ├── POST /login           # Public
///     │   └── POST /logout          # Authenticated
///     ├── /calendar                 # GET, authenticated
///     └── /tasks                    # Authenticated
///         ├── POST   /              # Add task
///         ├── GET    /?date=...     # Tasks for a date / full listing
///         ├── DELETE /:id           # Delete task
///         └── PATCH  /:id/toggle    # Toggle completion
/// ```
///
/// # Middleware stack
///
/// Applied in order (bottom to top): request tracing (tower-http
/// TraceLayer), CORS, session authentication (per-route-group).

use crate::{config::Config, error::ApiError};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use taskcal_shared::auth::session;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the session signing secret
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Authenticated session context
///
/// Inserted into request extensions by the session middleware after a token
/// validates. Handlers extract it with `Extension<Session>`.
#[derive(Debug, Clone)]
pub struct Session {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Elevated-access capability (cross-user listings)
    pub elevated: bool,

    /// Token ID, needed by logout to revoke this session
    pub jti: Uuid,

    /// When the session token expires
    pub expires_at: DateTime<Utc>,
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public auth endpoints
    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Logout needs the session it is revoking
    let logout_route = Router::new()
        .route("/logout", post(routes::auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let auth_routes = public_auth_routes.merge(logout_route);

    // Everything task/calendar related requires an authenticated session
    let protected_routes = Router::new()
        .route("/calendar", get(routes::calendar::calendar_view))
        .route("/tasks", post(routes::tasks::add_task))
        .route("/tasks", get(routes::tasks::list_tasks))
        .route("/tasks/:id", delete(routes::tasks::delete_task))
        .route("/tasks/:id/toggle", patch(routes::tasks::toggle_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session authentication middleware
///
/// Extracts the Bearer token from the Authorization header, validates
/// signature/expiry/issuer, rejects tokens revoked by logout, and injects a
/// [`Session`] into request extensions.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = session::validate_session_token(token, state.session_secret())?;

    if session::is_session_revoked(&state.db, claims.jti).await? {
        return Err(session::SessionError::Revoked.into());
    }

    let session = Session {
        user_id: claims.sub,
        elevated: claims.elevated,
        jti: claims.jti,
        expires_at: claims.expires_at(),
    };

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_context_carries_capability() {
        let session = Session {
            user_id: Uuid::new_v4(),
            elevated: true,
            jti: Uuid::new_v4(),
            expires_at: Utc::now(),
        };

        assert!(session.elevated);
    }
}
