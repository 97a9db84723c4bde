//! Storage backends for the mailing list
//!
//! Two implementations of [`MailingListRepository`]: an append-only CSV file
//! and an embedded SQLite database. Both treat a duplicate email as a
//! successful no-op.
//!
//! [`MailingListRepository`]: mailing_core::MailingListRepository

pub mod csv_file;
pub mod sqlite;

pub use csv_file::CsvMailingListRepository;
pub use sqlite::{SqliteMailingListRepository, StoredSignup};

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamp text written to the CSV file (RFC 3339, second precision).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a timestamp written by [`format_timestamp`] or any other RFC 3339
/// producer.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
