//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Environment variables the binary reads; cleared for every command so the
/// developer's shell cannot leak into tests.
const BOOKINGS_ENV: [&str; 4] = [
    "BOOKINGS_DATA_DIR",
    "BOOKINGS_LOG_MODE",
    "BOOKINGS_BUSY_TIMEOUT_MS",
    "BOOKINGS_FIRST_NAME_MIN_LENGTH",
];

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the bookings data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; the binary creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("bookings-data");
        Self { temp_dir, data_dir }
    }

    /// Create an environment with rooms already added.
    pub fn with_rooms(names: &[&str]) -> Self {
        let env = Self::new();
        env.command()
            .arg("add-room")
            .args(names)
            .assert()
            .success();
        env
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("bookings").expect("Failed to find bookings binary");
        for var in BOOKINGS_ENV {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Book `room` for `[start, end)` as the standard test guest.
    pub fn book(&self, room: &str, start: &str, end: &str) -> assert_cmd::assert::Assert {
        self.command()
            .args([
                "book",
                "--room",
                room,
                "--start",
                start,
                "--end",
                end,
                "--first-name",
                "John",
                "--last-name",
                "Smith",
                "--email",
                "john@smith.com",
                "--phone",
                "123456789",
            ])
            .assert()
    }

    /// Run a command and return its stdout.
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self.command().args(args).output().expect("Failed to run bookings");
        assert!(
            output.status.success(),
            "bookings {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("stdout was not UTF-8")
    }
}
