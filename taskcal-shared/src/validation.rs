//! Input validation
//!
//! Pure validators for registration, login, and task input. Each function
//! checks one rule and returns a [`ValidationError`] naming what failed; the
//! API layer composes them and aggregates per-field errors so a caller sees
//! every problem at once instead of fixing them one round-trip at a time.
//!
//! "Today" is always an explicit argument, never read from the ambient
//! clock, so date-boundary behavior is deterministic under test.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Special characters a password must draw from
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};:'\",.<>?/\\|`~";

/// Maximum username length (matches the column width)
const MAX_USERNAME_LEN: usize = 150;

/// Validation failures, one variant per rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Password too short or missing a required character class
    #[error("{0}")]
    WeakPassword(&'static str),

    /// Phone number does not match the accepted format
    #[error("Phone number must be 9-15 digits, optionally starting with + or 1")]
    InvalidPhoneFormat,

    /// Phone number already belongs to another account
    #[error("This phone number is already registered")]
    PhoneAlreadyRegistered,

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Due date precedes today
    #[error("Cannot add tasks to dates in the past")]
    PastDueDate,

    /// A required field is empty or absent
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Field exceeds its maximum length
    #[error("{0} is too long")]
    TooLong(&'static str),

    /// No account matches the given phone number
    #[error("User not found with this phone number")]
    UserNotFound,
}

/// Validates password strength
///
/// Requires at least 8 characters, at least one digit, and at least one
/// character from [`SPECIAL_CHARS`].
///
/// # Example
///
/// ```
/// use taskcal_shared::validation::validate_password;
///
/// assert!(validate_password("p@ssw0rd").is_ok());
/// assert!(validate_password("password").is_err()); // no digit, no special
/// ```
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(ValidationError::WeakPassword(
            "Password must be at least 8 characters long",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::WeakPassword(
            "Password must contain at least one number",
        ));
    }

    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(ValidationError::WeakPassword(
            "Password must contain at least one special character",
        ));
    }

    Ok(())
}

/// Validates phone number format
///
/// Accepts 9-15 digits with an optional leading `+` and an optional leading
/// country code `1`. Uniqueness is a separate, query-backed check so format
/// problems and availability problems can be reported independently.
pub fn validate_phone_format(phone: &str) -> Result<(), ValidationError> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?1?\d{9,15}$").expect("Failed to compile phone regex")
    });

    if regex.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhoneFormat)
    }
}

/// Validates that a password and its confirmation agree
pub fn validate_passwords_match(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password == confirm {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// Validates that a due date is not in the past
///
/// `today` itself is acceptable: a task due today is not overdue at creation
/// time.
pub fn validate_due_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        Err(ValidationError::PastDueDate)
    } else {
        Ok(())
    }
}

/// Validates a username
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::MissingField("Username"));
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong("Username"));
    }

    Ok(())
}
