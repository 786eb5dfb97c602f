//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::{BookingSettings, Config, DatabaseSettings};
use super::validator::ConfigValidator;
use crate::logging::LogLevel;
use proptest::prelude::*;
use std::path::PathBuf;

fn log_level_strategy() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Quiet),
        Just(LogLevel::Normal),
        Just(LogLevel::Verbose),
    ]
}

fn database_strategy() -> impl Strategy<Value = DatabaseSettings> {
    (
        prop::option::of("[a-z]{1,12}\\.db"),
        prop::option::of(1u64..=60_000),
    )
        .prop_map(|(path, busy_timeout_ms)| DatabaseSettings {
            path: path.map(PathBuf::from),
            busy_timeout_ms,
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(database_strategy()),
        prop::option::of(prop::option::of(1usize..=20)),
        prop::option::of(log_level_strategy()),
    )
        .prop_map(|(database, min, log_mode)| Config {
            database,
            booking: min.map(|first_name_min_length| BookingSettings {
                first_name_min_length,
            }),
            log_mode,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Every field set in the higher source wins; unset fields keep the lower value
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(
            result.busy_timeout(),
            if high.database.as_ref().and_then(|d| d.busy_timeout_ms).is_some() {
                high.busy_timeout()
            } else {
                low.busy_timeout()
            }
        );
        prop_assert_eq!(
            result.booking_rules().first_name_min_length,
            high.booking
                .as_ref()
                .and_then(|b| b.first_name_min_length)
                .or(low.booking.as_ref().and_then(|b| b.first_name_min_length))
                .unwrap_or(super::DEFAULT_FIRST_NAME_MIN_LENGTH)
        );
        prop_assert_eq!(result.log_mode, high.log_mode.or(low.log_mode));
        prop_assert_eq!(
            result.database.as_ref().and_then(|d| d.path.clone()),
            high.database
                .as_ref()
                .and_then(|d| d.path.clone())
                .or_else(|| low.database.as_ref().and_then(|d| d.path.clone()))
        );
    }

    // Empty config is identity element for merge
    #[test]
    fn config_merge_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    // Merging generated values never produces an invalid config
    #[test]
    fn merged_configs_stay_valid(a in config_strategy(), b in config_strategy()) {
        let mut merged = a;
        ConfigMerger::merge_into(&mut merged, &b);
        prop_assert!(ConfigValidator::validate(&merged).is_ok());
    }

    // Merging is associative
    #[test]
    fn config_merge_associative(
        a in config_strategy(),
        b in config_strategy(),
        c in config_strategy()
    ) {
        let mut left = a.clone();
        ConfigMerger::merge_into(&mut left, &b);
        ConfigMerger::merge_into(&mut left, &c);

        let mut b_merge_c = b;
        ConfigMerger::merge_into(&mut b_merge_c, &c);
        let mut right = a;
        ConfigMerger::merge_into(&mut right, &b_merge_c);

        prop_assert_eq!(left, right);
    }
}
