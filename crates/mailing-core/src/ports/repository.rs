//! Mailing list persistence port

use crate::types::SignupRecord;
use crate::Result;
use async_trait::async_trait;

/// Signup store.
///
/// `save` is idempotent on email: when a record with the same email already
/// exists the call succeeds without touching the stored record. Errors are
/// reserved for I/O and database failures, never for duplicates.
#[async_trait]
pub trait MailingListRepository: Send + Sync {
    /// Persist `record` unless its email is already stored. A missing
    /// `created_at` is stamped with the current time.
    async fn save(&self, record: &SignupRecord) -> Result<()>;

    /// Release the underlying handle. Calling it more than once is allowed.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
