/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new account
/// - `POST /v1/auth/login` - Log in with phone number and password
/// - `POST /v1/auth/logout` - Revoke the current session
///
/// Registration leaves the caller anonymous; an explicit login follows.
/// Login failures always report one generic message so the response cannot
/// be used to enumerate which phone numbers hold accounts.

use crate::{
    app::{AppState, Session},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskcal_shared::{
    auth::{password, session},
    models::user::{CreateUser, User},
    validation,
};

/// Single generic login failure message (no account enumeration)
const LOGIN_FAILED: &str = "Incorrect password or user not found";

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Username (unique)
    pub username: String,

    /// Phone number, the future login identity
    pub phone_number: String,

    /// Password
    pub password: String,

    /// Password confirmation
    pub password_confirm: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Created user ID
    pub user_id: String,

    /// Status message
    pub message: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Phone number
    pub phone_number: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Session token (Bearer)
    pub session_token: String,

    /// Status message
    pub message: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Status message
    pub message: String,
}

/// Register a new user
///
/// Runs every field validator and aggregates the failures, so one response
/// reports all problems at once instead of short-circuiting at the first.
/// The phone-availability pre-check is for reporting only; the uniqueness
/// constraint is the authority, and losing a race to a concurrent duplicate
/// surfaces as the same field error.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "phone_number": "+12345678901",
///   "password": "s3cret!pw",
///   "password_confirm": "s3cret!pw"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: field-level validation failures
/// - `500 Internal Server Error`: server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let mut errors: Vec<ValidationErrorDetail> = Vec::new();

    if let Err(e) = validation::validate_username(&req.username) {
        errors.push(ValidationErrorDetail::new("username", e));
    }

    match validation::validate_phone_format(&req.phone_number) {
        Err(e) => errors.push(ValidationErrorDetail::new("phone_number", e)),
        Ok(()) => {
            if User::phone_exists(&state.db, &req.phone_number).await? {
                errors.push(ValidationErrorDetail::new(
                    "phone_number",
                    validation::ValidationError::PhoneAlreadyRegistered,
                ));
            }
        }
    }

    if let Err(e) = validation::validate_password(&req.password) {
        errors.push(ValidationErrorDetail::new("password", e));
    }

    if let Err(e) = validation::validate_passwords_match(&req.password, &req.password_confirm) {
        errors.push(ValidationErrorDetail::new("password_confirm", e));
    }

    if !errors.is_empty() {
        return Err(ApiError::ValidationError(errors));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            phone_number: req.phone_number,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(RegisterResponse {
        user_id: user.id.to_string(),
        message: "Registration successful! Please log in.".to_string(),
    }))
}

/// Login with phone number and password
///
/// Resolves the phone to an account, verifies the credential, and issues a
/// session token. Whether the phone was unknown or the password wrong, the
/// response is the same generic 401.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "phone_number": "+12345678901",
///   "password": "s3cret!pw"
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_phone(&state.db, &req.phone_number)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(LOGIN_FAILED.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(LOGIN_FAILED.to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    let claims = session::SessionClaims::new(user.id, user.is_admin);
    let token = session::create_session_token(&claims, state.session_secret())
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        session_token: token,
        message: "Login Successful".to_string(),
    }))
}

/// Logout, revoking the current session
///
/// Unconditional: revoking an already-revoked session is a no-op, so a
/// double logout still reports success.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/logout
/// Authorization: Bearer <session token>
/// ```
pub async fn logout(
    State(state): State<AppState>,
    Extension(sess): Extension<Session>,
) -> ApiResult<Json<LogoutResponse>> {
    session::revoke_session(&state.db, sess.jti, sess.expires_at).await?;

    tracing::info!(user_id = %sess.user_id, "User logged out");

    Ok(Json(LogoutResponse {
        message: "Logged out".to_string(),
    }))
}
