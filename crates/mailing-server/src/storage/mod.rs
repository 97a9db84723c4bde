//! Storage backend selection

use crate::config::{ServerConfig, StorageBackend};
use anyhow::{Context, Result};
use mailing_core::MailingListRepository;
use mailing_storage::{CsvMailingListRepository, SqliteMailingListRepository};
use std::sync::Arc;
use tracing::info;

/// Open the backend named by `STORAGE_BACKEND`.
pub async fn open_repository(config: &ServerConfig) -> Result<Arc<dyn MailingListRepository>> {
    match config.storage_backend {
        StorageBackend::Sqlite => {
            info!("Initializing SQLite database...");
            let repo = SqliteMailingListRepository::new(&config.db_path)
                .await
                .with_context(|| {
                    format!("Failed to initialize database at: {}", config.db_path)
                })?;
            info!("SQLite database initialized at: {}", config.db_path);
            Ok(Arc::new(repo))
        }
        StorageBackend::Csv => {
            info!("Using CSV file storage at: {}", config.csv_path);
            Ok(Arc::new(CsvMailingListRepository::new(&config.csv_path)))
        }
    }
}
