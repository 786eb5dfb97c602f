//! Integration tests for global flags, environment handling, and exit codes.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();

    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("book"))
        .stdout(predicate::str::contains("calendar"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();

    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookings"));
}

#[test]
fn test_data_dir_from_environment() {
    let env = TestEnv::new();

    env.command_bare()
        .env("BOOKINGS_DATA_DIR", &env.data_dir)
        .args(["add-room", "Room"])
        .assert()
        .success();
    assert!(env.data_dir.join("bookings.db").exists());

    // The flag and the variable point at the same database
    let output = env.stdout(&["rooms"]);
    assert!(output.contains("Room"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let env = TestEnv::new();

    env.command()
        .args(["--verbose", "rooms"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn test_log_mode_from_environment() {
    let env = TestEnv::new();

    env.command()
        .env("BOOKINGS_LOG_MODE", "verbose")
        .arg("rooms")
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn test_invalid_config_file_exit_code() {
    let env = TestEnv::new();
    std::fs::create_dir_all(&env.data_dir).unwrap();
    std::fs::write(env.data_dir.join("config.yaml"), "unknown_key: 1\n").unwrap();

    env.command()
        .arg("rooms")
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_invalid_environment_value_exit_code() {
    let env = TestEnv::new();

    env.command()
        .env("BOOKINGS_BUSY_TIMEOUT_MS", "soon")
        .arg("rooms")
        .assert()
        .failure()
        .code(7);
}

#[test]
fn test_busy_timeout_zero_rejected() {
    let env = TestEnv::new();

    env.command()
        .args(["--busy-timeout", "0", "rooms"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let env = TestEnv::new();

    env.command().assert().failure().code(2);
}
