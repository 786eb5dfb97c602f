//! Configuration schema definitions.
//!
//! Every field is optional so partial configurations from different sources
//! can be merged; the accessors on [`Config`] apply the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::booking::BookingRules;
use crate::database::{DatabaseConfig, DATABASE_FILE_NAME};
use crate::logging::LogLevel;

/// Default busy timeout for database lock contention, in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Default minimum length of a guest's first name.
pub const DEFAULT_FIRST_NAME_MIN_LENGTH: usize = 3;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use bookings::config::{BookingSettings, Config};
///
/// let config: Config = serde_yaml::from_str(
///     "booking:\n  first_name_min_length: 2\nlog_mode: verbose\n",
/// )
/// .unwrap();
/// assert_eq!(config.booking_rules().first_name_min_length, 2);
/// assert_eq!(
///     config.booking,
///     Some(BookingSettings { first_name_min_length: Some(2) })
/// );
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Storage settings.
    pub database: Option<DatabaseSettings>,

    /// Booking rules.
    pub booking: Option<BookingSettings>,

    /// Log verbosity.
    pub log_mode: Option<LogLevel>,
}

/// Storage settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSettings {
    /// Database file; relative paths are taken from the data directory.
    pub path: Option<PathBuf>,

    /// How long to wait on a locked database, in milliseconds.
    pub busy_timeout_ms: Option<u64>,
}

/// Booking rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingSettings {
    /// Minimum number of characters in a guest's first name.
    pub first_name_min_length: Option<usize>,
}

impl Config {
    /// Busy timeout, or the default.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        let ms = self
            .database
            .as_ref()
            .and_then(|d| d.busy_timeout_ms)
            .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
        Duration::from_millis(ms)
    }

    /// Booking rules with defaults applied.
    #[must_use]
    pub fn booking_rules(&self) -> BookingRules {
        BookingRules {
            first_name_min_length: self
                .booking
                .as_ref()
                .and_then(|b| b.first_name_min_length)
                .unwrap_or(DEFAULT_FIRST_NAME_MIN_LENGTH),
        }
    }

    /// Log level, or Normal.
    #[must_use]
    pub fn log_level(&self) -> LogLevel {
        self.log_mode.unwrap_or(LogLevel::Normal)
    }

    /// Database file location inside `data_dir` unless configured.
    #[must_use]
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        match self.database.as_ref().and_then(|d| d.path.as_ref()) {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(DATABASE_FILE_NAME),
        }
    }

    /// Connection settings for the database in `data_dir`.
    #[must_use]
    pub fn database_config(&self, data_dir: &Path) -> DatabaseConfig {
        DatabaseConfig::new(self.database_path(data_dir)).with_busy_timeout(self.busy_timeout())
    }
}
