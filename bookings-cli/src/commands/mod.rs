//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and database
//! - `add_room`: Add rooms
//! - `rooms`: List rooms
//! - `search`: Find rooms free over a date range
//! - `book`: Book a room for a guest
//! - `list`: List reservations
//! - `calendar`: Show a room's occupancy night by night
//! - `block`: Add an owner block

pub mod add_room;
pub mod block;
pub mod book;
pub mod calendar;
pub mod init;
pub mod list;
pub mod rooms;
pub mod search;

pub use add_room::AddRoomCommand;
pub use block::BlockCommand;
pub use book::BookCommand;
pub use calendar::CalendarCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use rooms::RoomsCommand;
pub use search::SearchCommand;
