//! HTTP handlers

pub mod error;
pub mod health;
pub mod mailing_list;

pub use error::ApiError;
pub use health::health;
