//! SQLite backend (embedded, no external dependencies)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailing_core::{MailingError, MailingListRepository, Result, SignupRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Path that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

pub struct SqliteMailingListRepository {
    pool: SqlitePool,
}

/// A row of the `mailing_list` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredSignup {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredSignup> for SignupRecord {
    fn from(r: StoredSignup) -> Self {
        SignupRecord {
            username: r.username,
            email: r.email,
            created_at: Some(r.created_at),
        }
    }
}

impl SqliteMailingListRepository {
    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Opening SQLite database at: {}", database_path);

        let (options, max_connections) = if database_path == IN_MEMORY {
            // Every connection to :memory: is a separate database, so the pool
            // holds exactly one and never recycles it.
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(db_error("failed to open database"))?;
            (options, 1)
        } else {
            if let Some(parent) = std::path::Path::new(database_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            let options = SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true);
            (options, 5)
        };

        let options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(db_error("failed to open database"))?;

        Self::init_schema(&pool).await?;

        info!("Database initialization complete");
        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mailing_list (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_error("failed to create schema"))?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_mailing_list_email ON mailing_list(email)
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_error("failed to create schema"))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_mailing_list_created_at ON mailing_list(created_at)
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_error("failed to create schema"))?;

        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<SignupRecord>> {
        let row: Option<StoredSignup> = sqlx::query_as(
            r#"
            SELECT id, username, email, created_at FROM mailing_list WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("failed to query mailing list"))?;

        Ok(row.map(Into::into))
    }

    /// Every stored row, newest first.
    pub async fn list(&self) -> Result<Vec<StoredSignup>> {
        let rows: Vec<StoredSignup> = sqlx::query_as(
            r#"
            SELECT id, username, email, created_at FROM mailing_list
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("failed to query mailing list"))?;

        Ok(rows)
    }
}

#[async_trait]
impl MailingListRepository for SqliteMailingListRepository {
    async fn save(&self, record: &SignupRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO mailing_list (username, email, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&record.username)
        .bind(&record.email)
        .bind(record.created_at_or_now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                info!("Email already subscribed: {}", record.email);
                Ok(())
            }
            Err(e) => Err(db_error("failed to save mailing list entry")(e)),
        }
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> MailingError {
    move |e| MailingError::Database(format!("{}: {}", context, e))
}
