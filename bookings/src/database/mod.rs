//! `SQLite` storage for rooms, reservations, restrictions, and users.
//!
//! [`Database`] implements [`Repository`](crate::Repository). Overlap
//! between restrictions on a room is refused twice: by a transactional
//! re-check in `commit_booking`, and by a trigger for any other writer.
//!
//! # Examples
//!
//! ```no_run
//! use bookings::database::{Database, DatabaseConfig};
//! use bookings::{Guest, NewReservation, Repository, StayRange};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/bookings.db")).unwrap();
//! let room = db.insert_room("General's Quarters").unwrap();
//!
//! let range = StayRange::parse("2030-01-01", "2030-01-02").unwrap();
//! let reservation = NewReservation::builder(room, range)
//!     .guest(Guest::new("Ada", "Lovelace", "ada@example.com", ""))
//!     .build()
//!     .unwrap();
//! db.commit_booking(&reservation).unwrap();
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
