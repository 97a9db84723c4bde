//! Error types for the mailing list service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MailingError>;

/// Structural problems with a signup record. Exactly one is reported per
/// validation, the first check that fails.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email is required")]
    EmailRequired,

    #[error("invalid email format")]
    InvalidEmailFormat,

    #[error("username is required")]
    UsernameRequired,
}

#[derive(Error, Debug)]
pub enum MailingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl MailingError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, MailingError::Validation(_))
    }
}
