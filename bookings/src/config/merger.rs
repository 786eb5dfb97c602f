//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{BookingSettings, Config, DatabaseSettings};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use bookings::config::{BookingSettings, Config, ConfigMerger};
///
/// let low = Config {
///     booking: Some(BookingSettings { first_name_min_length: Some(3) }),
///     ..Default::default()
/// };
/// let high = Config {
///     booking: Some(BookingSettings { first_name_min_length: Some(5) }),
///     ..Default::default()
/// };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.booking_rules().first_name_min_length, 5);
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Every leaf field is overwritten only when the source sets it; nested
    /// sections merge field by field.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if let Some(ref database) = source.database {
            let merged = Self::merge_database(target.database.as_ref(), database);
            target.database = Some(merged);
        }

        if let Some(ref booking) = source.booking {
            let merged = Self::merge_booking(target.booking.as_ref(), booking);
            target.booking = Some(merged);
        }

        if source.log_mode.is_some() {
            target.log_mode = source.log_mode;
        }
    }

    fn merge_database(target: Option<&DatabaseSettings>, source: &DatabaseSettings) -> DatabaseSettings {
        let mut merged = target.cloned().unwrap_or_default();
        if source.path.is_some() {
            merged.path.clone_from(&source.path);
        }
        if source.busy_timeout_ms.is_some() {
            merged.busy_timeout_ms = source.busy_timeout_ms;
        }
        merged
    }

    fn merge_booking(target: Option<&BookingSettings>, source: &BookingSettings) -> BookingSettings {
        let mut merged = target.cloned().unwrap_or_default();
        if source.first_name_min_length.is_some() {
            merged.first_name_min_length = source.first_name_min_length;
        }
        merged
    }
}
