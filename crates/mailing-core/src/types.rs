//! Signup record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One mailing list subscription.
///
/// `email` is the natural key. `created_at` is optional on input; stores
/// stamp the current time when it is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRecord {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SignupRecord {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// The timestamp a store should persist for this record.
    pub fn created_at_or_now(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or_else(Utc::now)
    }
}
