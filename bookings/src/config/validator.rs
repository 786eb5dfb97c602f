//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use bookings::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref database) = config.database {
            if database.busy_timeout_ms == Some(0) {
                return Err(Error::InvalidConfig {
                    field: "database.busy_timeout_ms".into(),
                    message: "timeout must be greater than 0".into(),
                });
            }
            if let Some(ref path) = database.path {
                if path.as_os_str().is_empty() {
                    return Err(Error::InvalidConfig {
                        field: "database.path".into(),
                        message: "path must not be empty".into(),
                    });
                }
            }
        }

        if let Some(ref booking) = config.booking {
            if booking.first_name_min_length == Some(0) {
                return Err(Error::InvalidConfig {
                    field: "booking.first_name_min_length".into(),
                    message: "minimum length must be at least 1".into(),
                });
            }
        }

        Ok(())
    }
}
