#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # bookings
//!
//! Availability and reservation persistence for a small hotel.
//!
//! This library stores rooms, reservations, and the per-room date-range
//! restrictions that make up the availability calendar, and exposes the
//! search, stage, and confirm flow used to book a stay.
//!
//! ## Core Types
//!
//! - [`StayRange`]: a half-open `[start, end)` range of nights
//! - [`Repository`]: the storage contract, implemented by [`Database`]
//!   (SQLite) and [`MemoryRepository`] (in-process, with fault injection)
//! - [`AvailabilityEngine`]: availability checks and room calendars
//! - [`BookingOrchestrator`]: the search, stage, and confirm flow
//! - [`Form`] and [`FormErrors`]: field-level input validation
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use bookings::{AvailabilityEngine, MemoryRepository, Repository, StayRange};
//! use chrono::NaiveDate;
//!
//! let repo = MemoryRepository::new();
//! let room = repo.insert_room("Major's Suite").unwrap();
//!
//! let start = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2030, 1, 3).unwrap();
//! assert_eq!(StayRange::new(start, end).unwrap().nights(), 2);
//!
//! let engine = AvailabilityEngine::new(&repo);
//! assert!(engine.is_room_available(room, start, end).unwrap());
//! ```

pub mod availability;
pub mod booking;
pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod logging;
pub mod memory;
pub mod repository;
pub mod reservation;
pub mod room;
pub mod stay;
pub mod user;

// Re-export key types at crate root for convenience
pub use availability::{AvailabilityEngine, RoomCalendar};
pub use booking::{
    BookingDraft, BookingOrchestrator, BookingRules, BookingSession, ConfirmOutcome, Confirmation,
};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, ErrorKind, Result};
pub use forms::{Form, FormData, FormErrors};
pub use logging::{init_logger, install_logger, LogLevel, Logger};
pub use memory::{FaultPlan, MemoryRepository};
pub use repository::Repository;
pub use reservation::{Guest, NewReservation, Reservation, ReservationId};
pub use room::{NewRoomRestriction, RestrictionId, RestrictionKind, Room, RoomId, RoomRestriction};
pub use stay::StayRange;
pub use user::{NewUser, User, UserId};
