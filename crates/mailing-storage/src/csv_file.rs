//! Append-only CSV backend
//!
//! Duplicate detection is a full scan of the file before each append. There
//! is no locking: two concurrent saves of the same email can both pass the
//! scan and append a line each. The server is expected to be the only writer.

use crate::{format_timestamp, parse_timestamp};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use mailing_core::{MailingError, MailingListRepository, Result, SignupRecord};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

pub const HEADER: [&str; 3] = ["Username", "Email", "CreatedAt"];

pub struct CsvMailingListRepository {
    path: PathBuf,
}

impl CsvMailingListRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records in file order. Rows with fewer than three columns
    /// are skipped; an unparseable timestamp is returned as `None`.
    pub async fn list(&self) -> Result<Vec<SignupRecord>> {
        let rows = self.read_rows().await?;

        Ok(rows
            .iter()
            .filter(|row| row.len() >= 3)
            .map(|row| SignupRecord {
                username: row[0].to_string(),
                email: row[1].to_string(),
                created_at: parse_timestamp(&row[2]),
            })
            .collect())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<SignupRecord>> {
        Ok(self.list().await?.into_iter().find(|r| r.email == email))
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let rows = self.read_rows().await?;
        Ok(rows.iter().any(|row| row.get(1) == Some(email)))
    }

    /// Data rows, header excluded. A missing file has no rows.
    async fn read_rows(&self) -> Result<Vec<StringRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());

        reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(csv_error)
    }
}

#[async_trait]
impl MailingListRepository for CsvMailingListRepository {
    async fn save(&self, record: &SignupRecord) -> Result<()> {
        if self.email_exists(&record.email).await? {
            info!("Email already subscribed: {}", record.email);
            return Ok(());
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let write_header = file.metadata().await?.len() == 0;

        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        if write_header {
            writer.write_record(HEADER).map_err(csv_error)?;
        }
        let created_at = format_timestamp(&record.created_at_or_now());
        writer
            .write_record([
                record.username.as_str(),
                record.email.as_str(),
                created_at.as_str(),
            ])
            .map_err(csv_error)?;
        let buf = writer
            .into_inner()
            .map_err(|e| MailingError::Csv(e.to_string()))?;

        file.write_all(&buf).await?;
        file.flush().await?;

        debug!("Appended {} to {}", record.email, self.path.display());
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> MailingError {
    MailingError::Csv(e.to_string())
}
