//! Signup service

use chrono::Utc;
use mailing_core::{validate, MailingListRepository, Result, SignupRecord};
use std::sync::Arc;

pub struct SignupService {
    repo: Arc<dyn MailingListRepository>,
}

impl SignupService {
    pub fn new(repo: Arc<dyn MailingListRepository>) -> Self {
        Self { repo }
    }

    /// Validate and persist one signup.
    ///
    /// The returned record always carries a fresh `created_at`, whatever the
    /// caller sent. A duplicate email is saved as a no-op by the store, so the
    /// caller still gets the freshly stamped record rather than the stored one.
    pub async fn handle_create(&self, input: SignupRecord) -> Result<SignupRecord> {
        validate(&input)?;

        let record = SignupRecord {
            username: input.username,
            email: input.email,
            created_at: Some(Utc::now()),
        };

        self.repo.save(&record).await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use mailing_core::{MailingError, ValidationError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepo {
        saved: Mutex<Vec<SignupRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl MailingListRepository for RecordingRepo {
        async fn save(&self, record: &SignupRecord) -> Result<()> {
            if self.fail {
                return Err(MailingError::Database("database is locked".to_string()));
            }
            self.saved.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_valid_signup_is_saved_with_fresh_timestamp() {
        let repo = Arc::new(RecordingRepo::default());
        let service = SignupService::new(repo.clone());

        let stale = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let input = SignupRecord::new("testuser", "test@example.com").with_created_at(stale);

        let before = Utc::now();
        let record = service.handle_create(input).await.unwrap();

        assert_eq!(record.username, "testuser");
        assert_eq!(record.email, "test@example.com");
        let created_at = record.created_at.expect("timestamp should be set");
        assert!(created_at >= before);

        let saved = repo.saved.lock().unwrap();
        assert_eq!(saved.as_slice(), &[record.clone()]);
    }

    #[tokio::test]
    async fn test_validation_error_is_returned_unchanged() {
        let repo = Arc::new(RecordingRepo::default());
        let service = SignupService::new(repo.clone());

        let err = service
            .handle_create(SignupRecord::new("testuser", "notanemail"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MailingError::Validation(ValidationError::InvalidEmailFormat)
        ));
        assert!(repo.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_username_is_rejected() {
        let service = SignupService::new(Arc::new(RecordingRepo::default()));

        let err = service
            .handle_create(SignupRecord::new("", "test@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "username is required");
    }

    #[tokio::test]
    async fn test_storage_error_is_propagated() {
        let repo = Arc::new(RecordingRepo {
            fail: true,
            ..Default::default()
        });
        let service = SignupService::new(repo);

        let err = service
            .handle_create(SignupRecord::new("testuser", "test@example.com"))
            .await
            .unwrap_err();

        assert!(!err.is_validation());
        assert!(err.to_string().contains("database is locked"));
    }
}
