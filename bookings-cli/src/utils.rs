//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management, and output formatting.

use crate::error::CliError;
use bookings::{Config, ConfigBuilder, Database, LogLevel};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options that apply to all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the busy timeout (in milliseconds).
    pub busy_timeout: Option<u64>,
}

/// Resolve the data directory.
///
/// Priority: `--data-dir` (or `BOOKINGS_DATA_DIR`, which clap folds into the
/// flag) > `~/.bookings`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => bookings::database::resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load configuration from the data directory and environment.
///
/// A `--busy-timeout` flag overrides every other source.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    let mut config = ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    if let Some(ms) = global.busy_timeout {
        if ms == 0 {
            return Err(CliError::InvalidArguments(
                "--busy-timeout must be greater than 0".to_string(),
            ));
        }
        config.database.get_or_insert_with(Default::default).busy_timeout_ms = Some(ms);
    }

    Ok(config)
}

/// Pick the log level: flags first, then the merged configuration
/// (environment over file), then the default.
pub fn resolve_log_level(global: &GlobalOptions) -> LogLevel {
    if global.verbose || global.quiet {
        return bookings::logging::resolve_level(global.verbose, global.quiet);
    }
    load_configuration(global).map_or_else(
        |_| bookings::logging::resolve_level(false, false),
        |config| config.log_level(),
    )
}

/// Open (creating if needed) the database described by `config`.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let data_dir = resolve_data_dir(global)?;
    let db_config = config.database_config(&data_dir);
    log::debug!(
        "opening {} (busy timeout {})",
        db_config.path.display(),
        format_timeout(db_config.busy_timeout)
    );
    Database::open(db_config).map_err(CliError::from)
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a duration in milliseconds for display.
pub fn format_timeout(timeout: Duration) -> String {
    format!("{}ms", timeout.as_millis())
}
