/// API route handlers
///
/// # Modules
///
/// - `health`: Liveness and database connectivity check
/// - `auth`: Registration, login, logout
/// - `calendar`: The month-grid calendar view
/// - `tasks`: Task CRUD (add, list, delete, toggle)

pub mod auth;
pub mod calendar;
pub mod health;
pub mod tasks;
