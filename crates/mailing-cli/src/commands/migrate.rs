//! Migrate command - Replay a CSV mailing list into SQLite

use anyhow::{bail, Context, Result};
use colored::Colorize;
use csv::{ReaderBuilder, StringRecord};
use mailing_core::{MailingListRepository, SignupRecord};
use mailing_storage::{parse_timestamp, SqliteMailingListRepository};
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Data rows seen, header excluded.
    pub processed: usize,
    /// Rows accepted by the store, duplicates included.
    pub imported: usize,
    /// Rows with fewer than three columns.
    pub skipped: usize,
    pub errors: usize,
}

pub async fn run(csv_path: &Path, db_path: &str) -> Result<MigrationReport> {
    info!("Starting migration from {} to {}", csv_path.display(), db_path);

    if !csv_path.exists() {
        bail!("CSV file does not exist: {}", csv_path.display());
    }

    let bytes = tokio::fs::read(csv_path)
        .await
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    let rows = read_rows(&bytes).context("Failed to read CSV file")?;

    let Some((header, records)) = rows.split_first() else {
        println!("CSV file is empty, nothing to migrate");
        return Ok(MigrationReport::default());
    };

    if header.len() < 3 {
        bail!(
            "Invalid CSV header: expected at least 3 columns, got {}",
            header.len()
        );
    }
    info!("CSV header: {:?}", header);

    let repo = SqliteMailingListRepository::new(db_path)
        .await
        .context("Failed to initialize SQLite repository")?;

    let report = replay(records, &repo).await;

    if let Err(e) = repo.close().await {
        warn!("Error closing database: {}", e);
    }

    print_report(&report, db_path);
    Ok(report)
}

/// All rows including the header. Rows may have differing column counts.
fn read_rows(bytes: &[u8]) -> Result<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    Ok(reader.records().collect::<Result<Vec<_>, _>>()?)
}

/// Save each data row through the repository. Line numbers in log messages
/// count the header as line 1.
pub async fn replay(records: &[StringRecord], repo: &dyn MailingListRepository) -> MigrationReport {
    let mut report = MigrationReport::default();

    for (i, row) in records.iter().enumerate() {
        let line = i + 2;
        report.processed += 1;

        if row.len() < 3 {
            warn!("Skipping invalid record at line {}: insufficient columns", line);
            report.skipped += 1;
            continue;
        }

        let created_at = parse_timestamp(&row[2]);
        if created_at.is_none() {
            warn!(
                "Failed to parse timestamp '{}' at line {}, using current time",
                &row[2], line
            );
        }

        let record = SignupRecord {
            username: row[0].to_string(),
            email: row[1].to_string(),
            created_at,
        };

        match repo.save(&record).await {
            Ok(()) => report.imported += 1,
            Err(e) => {
                error!("Error importing record at line {} ({}): {}", line, record.email, e);
                report.errors += 1;
            }
        }
    }

    report
}

fn print_report(report: &MigrationReport, db_path: &str) {
    println!();
    println!("{}", "=== Migration Complete ===".cyan().bold());
    println!("  Total records processed: {}", report.processed);
    println!("  Successfully imported:   {}", report.imported.to_string().green());
    println!("  Skipped (malformed):     {}", report.skipped.to_string().yellow());
    println!("  Errors:                  {}", report.errors.to_string().red());
    println!();

    if report.errors == 0 {
        println!("{} Database saved to: {}", "✅".green(), db_path);
    } else {
        println!(
            "{} Migration completed with errors. Please review the log above.",
            "⚠️".yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use mailing_core::MailingError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepo {
        saved: Mutex<Vec<SignupRecord>>,
    }

    #[async_trait]
    impl MailingListRepository for RecordingRepo {
        async fn save(&self, record: &SignupRecord) -> mailing_core::Result<()> {
            if record.email.starts_with("fail") {
                return Err(MailingError::Database("disk full".to_string()));
            }
            self.saved.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn data_rows(csv: &str) -> Vec<StringRecord> {
        let rows = read_rows(csv.as_bytes()).unwrap();
        rows[1..].to_vec()
    }

    #[tokio::test]
    async fn test_replay_counts_each_outcome() {
        let rows = data_rows(
            "Username,Email,CreatedAt\n\
             alice,alice@example.com,2024-01-02T03:04:05Z\n\
             short,row\n\
             bob,bob@example.com,not-a-date\n\
             carol,fail@example.com,2024-01-02T03:04:05Z\n",
        );
        let repo = RecordingRepo::default();

        let report = replay(&rows, &repo).await;

        assert_eq!(
            report,
            MigrationReport {
                processed: 4,
                imported: 2,
                skipped: 1,
                errors: 1,
            }
        );

        let saved = repo.saved.lock().unwrap();
        assert_eq!(
            saved[0].created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(saved[1].email, "bob@example.com");
        assert_eq!(saved[1].created_at, None);
    }

    #[tokio::test]
    async fn test_run_imports_into_sqlite() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let csv_path = dir.path().join("mailing_list.csv");
        let db_path = dir.path().join("blog.db").to_string_lossy().to_string();

        tokio::fs::write(
            &csv_path,
            "Username,Email,CreatedAt\n\
             alice,alice@example.com,2024-01-02T03:04:05Z\n\
             alice2,alice@example.com,2024-02-02T03:04:05Z\n\
             bob,bob@example.com,garbage\n",
        )
        .await?;

        let report = run(&csv_path, &db_path).await?;
        assert_eq!(report.processed, 3);
        assert_eq!(report.imported, 3);
        assert_eq!(report.errors, 0);

        let repo = SqliteMailingListRepository::new(&db_path).await?;
        let rows = repo.list().await?;
        assert_eq!(rows.len(), 2);

        let alice = repo.find_by_email("alice@example.com").await?.unwrap();
        assert_eq!(alice.username, "alice");
        assert_eq!(
            alice.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );
        assert!(repo.find_by_email("bob@example.com").await?.is_some());
        repo.close().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_run_missing_csv_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("blog.db").to_string_lossy().to_string();

        let err = run(&dir.path().join("nope.csv"), &db_path)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("CSV file does not exist"));
    }

    #[tokio::test]
    async fn test_run_empty_csv_is_noop() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let csv_path = dir.path().join("empty.csv");
        tokio::fs::write(&csv_path, "").await?;

        let report = run(&csv_path, "unused.db").await?;
        assert_eq!(report, MigrationReport::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_rejects_short_header() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let csv_path = dir.path().join("bad.csv");
        tokio::fs::write(&csv_path, "Username,Email\nalice,alice@example.com\n").await?;

        let err = run(&csv_path, "unused.db").await.unwrap_err();
        assert!(err.to_string().contains("Invalid CSV header"));
        Ok(())
    }
}
