//! Block command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use bookings::{NewRoomRestriction, Repository, RoomId, StayRange};
use clap::Args;

/// Block a room for a date range (owner block).
#[derive(Args)]
pub struct BlockCommand {
    /// Room to block
    #[arg(long, value_name = "ID")]
    pub room: i64,

    /// First blocked night (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Day after the last blocked night (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: String,
}

impl BlockCommand {
    /// Execute the block command.
    ///
    /// Fails with a conflict if any night is already reserved or blocked.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let range = StayRange::parse(&self.start, &self.end)?;
        let room = RoomId(self.room);

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let id = db.insert_room_restriction(&NewRoomRestriction::owner_block(room, range))?;
        if !global.quiet {
            println!("Blocked room {room} for {range} (restriction {id})");
        }
        Ok(())
    }
}
