//! # TaskCal Shared Library
//!
//! This crate contains the types, storage access, and business logic shared
//! by the TaskCal API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks) and their CRUD operations
//! - `db`: Connection pool and migration runner
//! - `auth`: Password hashing and session token utilities
//! - `validation`: Pure input validation (phone format, password rules, dates)
//! - `calendar`: Month-grid aggregation for the calendar view

pub mod auth;
pub mod calendar;
pub mod db;
pub mod models;
pub mod validation;

/// Current version of the TaskCal shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
