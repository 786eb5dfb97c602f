//! Library exports for bookings-cli.
//!
//! Exposes the CLI structure so the command definitions can be exercised
//! without spawning the binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
