//! Integration tests for the configuration system.
//!
//! Tests that modify environment variables are marked with `#[serial]`;
//! environment variables are process-global, so they must not run in
//! parallel with each other.

mod common;

use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use bookings::config::{
    BookingSettings, Config, ConfigBuilder, BUSY_TIMEOUT_ENV, CONFIG_FILE_NAME,
    FIRST_NAME_MIN_LENGTH_ENV,
};
use bookings::logging::LOG_MODE_ENV;
use bookings::{
    BookingOrchestrator, BookingSession, ConfirmOutcome, Database, ErrorKind, LogLevel,
    Repository,
};
use common::booking_form;

/// RAII guard for setting and restoring environment variables.
struct EnvGuard {
    key: &'static str,
    old_value: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self { key, old_value }
    }

    fn remove(key: &'static str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self { key, old_value }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(value) => env::set_var(self.key, value),
            None => env::remove_var(self.key),
        }
    }
}

fn clear_env() -> Vec<EnvGuard> {
    [BUSY_TIMEOUT_ENV, FIRST_NAME_MIN_LENGTH_ENV, LOG_MODE_ENV]
        .into_iter()
        .map(EnvGuard::remove)
        .collect()
}

fn write_config(dir: &Path, content: &str) {
    fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
}

#[test]
#[serial]
fn test_defaults_without_file_or_env() {
    let _env = clear_env();
    let temp = TempDir::new().unwrap();

    let config = ConfigBuilder::new()
        .with_data_dir(temp.path())
        .build()
        .unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.busy_timeout().as_millis(), 5000);
    assert_eq!(config.booking_rules().first_name_min_length, 3);
    assert_eq!(config.log_level(), LogLevel::Normal);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let _env = clear_env();
    let temp = TempDir::new().unwrap();
    write_config(
        temp.path(),
        "database:\n  busy_timeout_ms: 200\nbooking:\n  first_name_min_length: 5\nlog_mode: quiet\n",
    );
    let _timeout = EnvGuard::set(BUSY_TIMEOUT_ENV, "900");

    let config = ConfigBuilder::new()
        .with_data_dir(temp.path())
        .build()
        .unwrap();
    assert_eq!(config.busy_timeout().as_millis(), 900);
    assert_eq!(config.booking_rules().first_name_min_length, 5);
    assert_eq!(config.log_level(), LogLevel::Quiet);
}

#[test]
#[serial]
fn test_programmatic_overrides_env() {
    let _env = clear_env();
    let _min = EnvGuard::set(FIRST_NAME_MIN_LENGTH_ENV, "6");

    let config = ConfigBuilder::new()
        .skip_files()
        .with_config(Config {
            booking: Some(BookingSettings {
                first_name_min_length: Some(2),
            }),
            ..Default::default()
        })
        .build()
        .unwrap();
    assert_eq!(config.booking_rules().first_name_min_length, 2);
}

#[test]
#[serial]
fn test_invalid_env_value_rejected() {
    let _env = clear_env();
    let _min = EnvGuard::set(FIRST_NAME_MIN_LENGTH_ENV, "0");

    let err = ConfigBuilder::new().skip_files().build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_unknown_keys_rejected() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "database:\n  pool_size: 4\n");

    let err = ConfigBuilder::new()
        .with_data_dir(temp.path())
        .skip_env()
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_configured_database_path_is_used() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "database:\n  path: hotel.db\n");

    let config = ConfigBuilder::new()
        .with_data_dir(temp.path())
        .skip_env()
        .build()
        .unwrap();
    let db = Database::open(config.database_config(temp.path())).unwrap();
    db.insert_room("Room").unwrap();

    assert!(temp.path().join("hotel.db").exists());
    assert!(!temp.path().join("bookings.db").exists());
}

#[test]
fn test_configured_rules_drive_validation() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "booking:\n  first_name_min_length: 5\n");

    let config = ConfigBuilder::new()
        .with_data_dir(temp.path())
        .skip_env()
        .build()
        .unwrap();
    let db = Database::open(config.database_config(temp.path())).unwrap();
    db.insert_room("Room").unwrap();

    // "John" is long enough by default but not under this rule
    let orchestrator = BookingOrchestrator::new(&db, config.booking_rules());
    let mut session = BookingSession::default();
    let outcome = orchestrator
        .book_from_form(&mut session, &booking_form("1", "2030-01-01", "2030-01-02"))
        .unwrap();
    let ConfirmOutcome::Invalid { errors, .. } = outcome else {
        panic!("expected the first name to be rejected");
    };
    assert!(errors.get("first_name").is_some());
}
