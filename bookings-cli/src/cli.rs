//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AddRoomCommand, BlockCommand, BookCommand, CalendarCommand, InitCommand, ListCommand,
    RoomsCommand, SearchCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for room availability and reservations.
#[derive(Parser)]
#[command(name = "bookings")]
#[command(version, about = "Search room availability and book stays", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "BOOKINGS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the database busy timeout (in milliseconds)
    #[arg(long, value_name = "MILLIS", global = true)]
    pub busy_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Add one or more rooms
    AddRoom(AddRoomCommand),

    /// List rooms
    Rooms(RoomsCommand),

    /// Search for rooms free over a date range
    Search(SearchCommand),

    /// Book a room for a guest
    Book(BookCommand),

    /// List reservations
    List(ListCommand),

    /// Show night-by-night occupancy of a room
    Calendar(CalendarCommand),

    /// Block a room for a date range (owner block)
    Block(BlockCommand),
}
