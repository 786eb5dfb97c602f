//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::{Guest, NewReservation, RoomId, StayRange};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the lifetime of the test
    std::mem::forget(dir);

    db
}

/// Builds a reservation for `room` over `[start, end)` with a fixed guest.
///
/// # Panics
///
/// Panics if the dates do not form a valid range.
#[must_use]
pub fn create_test_reservation(room: RoomId, start: &str, end: &str) -> NewReservation {
    let range = StayRange::parse(start, end).unwrap();
    NewReservation::builder(room, range)
        .guest(Guest::new("Ada", "Lovelace", "ada@example.com", "555-0100"))
        .build()
        .unwrap()
}
