//! Inspect command - Dump the SQLite mailing list table

use anyhow::{Context, Result};
use colored::Colorize;
use mailing_core::MailingListRepository;
use mailing_storage::{format_timestamp, SqliteMailingListRepository, StoredSignup};

const RULE: &str =
    "--------------------------------------------------------------------------------";

pub async fn run(db_path: &str) -> Result<()> {
    let repo = SqliteMailingListRepository::new(db_path)
        .await
        .with_context(|| format!("Failed to open database: {}", db_path))?;

    let rows = repo.list().await.context("Failed to query database")?;
    repo.close().await?;

    println!();
    println!("{}", "=== Mailing List Records ===".cyan().bold());
    println!(
        "{}",
        format!(
            "{:<5} {:<20} {:<30} {:<25}",
            "ID", "Username", "Email", "Created At"
        )
        .bold()
    );
    println!("{}", RULE);
    for row in &rows {
        println!("{}", format_row(row));
    }
    println!("{}", RULE);
    println!("Total records: {}", rows.len());
    println!();

    Ok(())
}

fn format_row(row: &StoredSignup) -> String {
    format!(
        "{:<5} {:<20} {:<30} {:<25}",
        row.id,
        row.username,
        row.email,
        format_timestamp(&row.created_at)
    )
}
