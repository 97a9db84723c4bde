//! Signup record validation

use crate::error::ValidationError;
use crate::types::SignupRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Check a record's structure. Checks run in a fixed order and the first
/// failure wins: email presence, email format, username presence.
pub fn validate(record: &SignupRecord) -> Result<(), ValidationError> {
    validate_email(&record.email)?;
    validate_username(&record.username)
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }

    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(())
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }

    Ok(())
}
