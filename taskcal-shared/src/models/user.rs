/// User model and database operations
///
/// Users register with a username and a phone number; the phone number is the
/// login identity. Both carry uniqueness constraints so concurrent
/// registrations cannot race past the application-level availability checks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(150) NOT NULL UNIQUE,
///     phone_number VARCHAR(20) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display/login name, unique across all users
    pub username: String,

    /// Phone number used as the login identity
    ///
    /// Format `^\+?1?\d{9,15}$`, validated before persistence; unique.
    pub phone_number: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// Elevated-access capability
    ///
    /// Admins may list tasks across all users; everyone else is restricted to
    /// their own records by an implicit ownership filter.
    pub is_admin: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Username (must be unique)
    pub username: String,

    /// Phone number (must be unique, format-validated by the caller)
    pub phone_number: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username or phone number already exists
    /// (unique constraint violation) or the database is unreachable. Callers
    /// at the API boundary translate the constraint violation back into a
    /// field-level validation error.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, phone_number, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, phone_number, password_hash, is_admin,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(data.username)
        .bind(data.phone_number)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, phone_number, password_hash, is_admin,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by phone number
    ///
    /// This is the login identity lookup: the phone resolves to the stable
    /// user id that credential verification runs against.
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, phone_number, password_hash, is_admin,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a phone number is already registered
    ///
    /// Used during registration so the caller can report
    /// "already registered" alongside the other field errors. The uniqueness
    /// constraint remains the authority under concurrency; this check is for
    /// error reporting only.
    pub async fn phone_exists(pool: &PgPool, phone: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE phone_number = $1)")
                .bind(phone)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Updates the last login timestamp for a user
    ///
    /// Called after successful authentication.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            username: "alice".to_string(),
            phone_number: "+12345678901".to_string(),
            password_hash: "hash".to_string(),
        };

        assert_eq!(create_user.username, "alice");
        assert_eq!(create_user.phone_number, "+12345678901");
    }

    // Integration tests for database operations are in taskcal-api/tests/
}
