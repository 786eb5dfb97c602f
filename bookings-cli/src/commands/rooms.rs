//! Rooms command implementation.

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use bookings::Repository;
use clap::Args;

/// List rooms.
#[derive(Args)]
pub struct RoomsCommand {}

impl RoomsCommand {
    /// Execute the rooms command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        println!("ID\tNAME\tCREATED_AT");
        for room in db.all_rooms()? {
            println!(
                "{}\t{}\t{}",
                room.id,
                room.name,
                format_timestamp(room.created_at)
            );
        }
        Ok(())
    }
}
