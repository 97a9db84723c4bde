//! Server configuration, read from environment variables

use anyhow::{Context, Result};
use ::config::{Config, Environment, Source};
use serde::Deserialize;

pub const DEFAULT_SERVER_ADDR: &str = ":8080";
pub const DEFAULT_DB_PATH: &str = "blog.db";
pub const DEFAULT_CSV_PATH: &str = "mailing_list.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Csv,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// `SERVER_ADDR`; a bare `:port` listens on all interfaces.
    pub server_addr: String,
    /// `DB_PATH`
    pub db_path: String,
    /// `STORAGE_BACKEND`
    pub storage_backend: StorageBackend,
    /// `CSV_PATH`
    pub csv_path: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        Self::from_source(Environment::default())
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("server_addr", DEFAULT_SERVER_ADDR)?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("storage_backend", "sqlite")?
            .set_default("csv_path", DEFAULT_CSV_PATH)?
            .add_source(source)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Address handed to the listener.
    pub fn listen_address(&self) -> String {
        if self.server_addr.starts_with(':') {
            format!("0.0.0.0{}", self.server_addr)
        } else {
            self.server_addr.clone()
        }
    }
}
