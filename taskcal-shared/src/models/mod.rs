/// Database models for TaskCal
///
/// # Models
///
/// - `user`: User accounts, keyed by unique username and unique phone number
/// - `task`: User-owned tasks with a due date and completion flag
///
/// Every mutation that depends on ownership combines the id and owner checks
/// in a single statement, so "not yours" and "doesn't exist" are
/// indistinguishable and there is no check-then-act window.
///
/// # Example
///
/// ```no_run
/// use taskcal_shared::models::user::{CreateUser, User};
/// use taskcal_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         phone_number: "+12345678901".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
