//! Environment variable handling for configuration overrides.
//!
//! `BOOKINGS_*` variables override values from the configuration file.

use std::env;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::logging::{LogLevel, LOG_MODE_ENV};

/// Overrides `database.busy_timeout_ms`.
pub const BUSY_TIMEOUT_ENV: &str = "BOOKINGS_BUSY_TIMEOUT_MS";

/// Overrides `booking.first_name_min_length`.
pub const FIRST_NAME_MIN_LENGTH_ENV: &str = "BOOKINGS_FIRST_NAME_MIN_LENGTH";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use bookings::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value that cannot be
    /// parsed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(ms) = Self::parse_var::<u64>(BUSY_TIMEOUT_ENV)? {
            config.database.get_or_insert_with(Default::default).busy_timeout_ms = Some(ms);
        }

        if let Some(min) = Self::parse_var::<usize>(FIRST_NAME_MIN_LENGTH_ENV)? {
            config
                .booking
                .get_or_insert_with(Default::default)
                .first_name_min_length = Some(min);
        }

        if let Ok(mode) = env::var(LOG_MODE_ENV) {
            let level = LogLevel::parse(&mode).map_err(|message| Error::InvalidConfig {
                field: LOG_MODE_ENV.into(),
                message,
            })?;
            config.log_mode = Some(level);
        }

        Ok(())
    }

    fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::InvalidConfig {
                    field: name.into(),
                    message: format!("must be a non-negative integer, got '{value}'"),
                }),
            Err(_) => Ok(None),
        }
    }
}
