//! Mailing List Core Library
//!
//! Domain types, validation rules and the storage port shared by the server
//! and the operator CLI.

pub mod error;
pub mod ports;
pub mod types;
pub mod validator;

pub use error::{MailingError, Result, ValidationError};
pub use ports::MailingListRepository;
pub use types::SignupRecord;
pub use validator::validate;
