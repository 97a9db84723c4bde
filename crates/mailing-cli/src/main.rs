//! Mailing List CLI
//!
//! Operator tools for the mailing list store: import a legacy CSV file into
//! SQLite and dump the SQLite table.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "mailing")]
#[command(author, version, about = "Mailing list operator tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a CSV mailing list into a SQLite database
    Migrate {
        /// Path to the CSV file
        #[arg(long, default_value = "mailing_list.csv")]
        csv: PathBuf,

        /// Path to the SQLite database
        #[arg(long, env = "DB_PATH", default_value = "blog.db")]
        db: String,
    },

    /// Print every signup stored in a SQLite database
    Inspect {
        /// Path to the SQLite database
        #[arg(env = "DB_PATH", default_value = "blog.db")]
        db: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "mailing_cli=debug,mailing_storage=debug"
        } else {
            "mailing_cli=info,mailing_storage=warn"
        })
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = match cli.command {
        Commands::Migrate { csv, db } => commands::migrate::run(&csv, &db).await.map(|_| ()),
        Commands::Inspect { db } => commands::inspect::run(&db).await,
    };

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}
