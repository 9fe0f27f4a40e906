/// Session token generation, validation, and revocation
///
/// Sessions are HS256-signed JWTs. Each token carries a random `jti`; logout
/// inserts that `jti` into the `revoked_sessions` table, and the auth
/// middleware rejects revoked tokens for the rest of their lifetime. This
/// gives the `anonymous -> authenticated -> anonymous` lifecycle real
/// server-side teeth instead of relying on clients discarding the token.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC-SHA256)
/// - **Expiration**: 24 hours
/// - **Validation**: signature, expiration, issuer, and revocation checks
/// - **Secret**: at least 32 bytes, supplied via configuration
///
/// # Example
///
/// ```
/// use taskcal_shared::auth::session::{create_session_token, validate_session_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes";
///
/// let claims = SessionClaims::new(user_id, false);
/// let token = create_session_token(&claims, secret)?;
///
/// let validated = validate_session_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Issuer claim stamped into every session token
const ISSUER: &str = "taskcal";

/// How long a session token stays valid
const SESSION_LIFETIME_HOURS: i64 = 24;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate session token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Session token has expired")]
    Expired,

    /// Token was revoked by logout
    #[error("Session token has been revoked")]
    Revoked,
}

/// Claims carried by a session token
///
/// # Standard claims
///
/// - `sub`: user ID
/// - `iss`: always "taskcal"
/// - `iat` / `exp` / `nbf`: Unix timestamps
/// - `jti`: random token ID, the revocation key
///
/// # Custom claims
///
/// - `elevated`: the elevated-access capability, set from the user's admin
///   flag at login; privileged listings check this rather than re-reading
///   the user row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "taskcal"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token ID, used as the revocation key on logout
    pub jti: Uuid,

    /// Elevated-access capability (admin listings)
    pub elevated: bool,
}

impl SessionClaims {
    /// Creates new session claims with the default 24-hour expiration
    pub fn new(user_id: Uuid, elevated: bool) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(SESSION_LIFETIME_HOURS);

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4(),
            elevated,
        }
    }

    /// Expiration as a timestamp usable for the revocation row
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Creates a signed session token from claims
///
/// # Errors
///
/// Returns `SessionError::CreateError` if encoding fails
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
/// Revocation is a separate, database-backed check
/// ([`is_session_revoked`]) because it needs a pool.
///
/// # Errors
///
/// Returns `SessionError::Expired` for expired tokens and
/// `SessionError::ValidationError` for every other defect.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::ValidationError(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

/// Revokes a session by its token ID
///
/// Idempotent: revoking an already-revoked session succeeds, so logout never
/// fails.
pub async fn revoke_session(
    pool: &PgPool,
    jti: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO revoked_sessions (jti, expires_at)
        VALUES ($1, $2)
        ON CONFLICT (jti) DO NOTHING
        "#,
    )
    .bind(jti)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Checks whether a session has been revoked
pub async fn is_session_revoked(pool: &PgPool, jti: Uuid) -> Result<bool, sqlx::Error> {
    let (revoked,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM revoked_sessions WHERE jti = $1)")
            .bind(jti)
            .fetch_one(pool)
            .await?;

    Ok(revoked)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let claims = SessionClaims::new(user_id, false);
        let token = create_session_token(&claims, SECRET).expect("Create should succeed");

        let validated = validate_session_token(&token, SECRET).expect("Validate should succeed");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.jti, claims.jti);
        assert!(!validated.elevated);
    }

    #[test]
    fn test_elevated_claim_round_trips() {
        let claims = SessionClaims::new(Uuid::new_v4(), true);
        let token = create_session_token(&claims, SECRET).expect("Create should succeed");

        let validated = validate_session_token(&token, SECRET).expect("Validate should succeed");
        assert!(validated.elevated);
    }

    #[test]
    fn test_validate_with_wrong_secret_fails() {
        let claims = SessionClaims::new(Uuid::new_v4(), false);
        let token = create_session_token(&claims, SECRET).expect("Create should succeed");

        let result = validate_session_token(&token, "a-completely-different-32-byte-secret");
        assert!(result.is_err(), "Wrong secret should fail validation");
    }

    #[test]
    fn test_validate_garbage_token_fails() {
        let result = validate_session_token("not.a.token", SECRET);
        assert!(matches!(result, Err(SessionError::ValidationError(_))));
    }

    #[test]
    fn test_each_session_gets_a_fresh_jti() {
        let user_id = Uuid::new_v4();
        let a = SessionClaims::new(user_id, false);
        let b = SessionClaims::new(user_id, false);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expires_at_matches_exp() {
        let claims = SessionClaims::new(Uuid::new_v4(), false);
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }
}
