/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Session tokens (HS256 JWTs) with server-side revocation
///
/// The session lifecycle is `anonymous -> authenticated -> anonymous`:
/// login issues a token bound to the user id, logout revokes the token's
/// `jti` so the middleware rejects it for the remainder of its lifetime.
///
/// # Example
///
/// ```no_run
/// use taskcal_shared::auth::password::{hash_password, verify_password};
/// use taskcal_shared::auth::session::{create_session_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = SessionClaims::new(Uuid::new_v4(), false);
/// let token = create_session_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session;
