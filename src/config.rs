use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Directory export files are written to.
    pub export_path: PathBuf,
    /// Delay between polls of an empty job queue, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults for
    /// everything except `DATABASE_URL`.
    pub fn from_env() -> Result<Self> {
        ::config::Config::builder()
            .set_default("server_host", "0.0.0.0")?
            .set_default("server_port", 3000)?
            .set_default("export_path", "exports")?
            .set_default("poll_interval_ms", 500)?
            .add_source(::config::Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration (is DATABASE_URL set?)")
    }
}
