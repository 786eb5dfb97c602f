//! Common test utilities for integration tests.
//!
//! Fixtures shared by the repository, booking, and concurrency suites.

use std::path::{Path, PathBuf};

use bookings::{Database, DatabaseConfig, FormData, Guest, NewReservation, RoomId, StayRange};
use chrono::NaiveDate;

/// Creates a test database in a temporary location.
///
/// The temporary directory is leaked so the file outlives the handle.
#[allow(dead_code)]
pub fn create_test_database() -> Database {
    open_database(&create_test_database_path())
}

/// Returns a fresh database path inside a leaked temporary directory.
#[allow(dead_code)]
pub fn create_test_database_path() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookings.db");
    std::mem::forget(dir);
    path
}

/// Opens (creating if needed) the database at `path`.
#[allow(dead_code)]
pub fn open_database(path: &Path) -> Database {
    Database::open(DatabaseConfig::new(path)).unwrap()
}

/// Parses a `YYYY-MM-DD` date.
#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// The guest used by every fixture reservation.
#[allow(dead_code)]
pub fn test_guest() -> Guest {
    Guest::new("John", "Smith", "john@smith.com", "123456789")
}

/// Builds a reservation for `room` over `[start, end)`.
#[allow(dead_code)]
pub fn reservation(room: RoomId, start: &str, end: &str) -> NewReservation {
    NewReservation::builder(room, StayRange::parse(start, end).unwrap())
        .guest(test_guest())
        .build()
        .unwrap()
}

/// A complete booking form submission.
#[allow(dead_code)]
pub fn booking_form(room: &str, start: &str, end: &str) -> FormData {
    [
        ("start_date", start),
        ("end_date", end),
        ("room_id", room),
        ("first_name", "John"),
        ("last_name", "Smith"),
        ("email", "john@smith.com"),
        ("phone", "123456789"),
    ]
    .into_iter()
    .collect()
}
