//! Search command implementation.
//!
//! Lists the rooms free for every night in `[start, end)`.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use bookings::stay::parse_date;
use bookings::{BookingOrchestrator, RoomId};
use clap::Args;

/// Search for rooms free over a date range.
#[derive(Args)]
pub struct SearchCommand {
    /// Arrival date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Departure date (YYYY-MM-DD), exclusive
    #[arg(long, value_name = "DATE")]
    pub end: String,

    /// Only check this room
    #[arg(long, value_name = "ID")]
    pub room: Option<i64>,
}

impl SearchCommand {
    /// Execute the search command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let start = parse_date("start", &self.start)?;
        let end = parse_date("end", &self.end)?;

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let orchestrator = BookingOrchestrator::new(&db, config.booking_rules());

        let rooms = orchestrator.search(start, end, self.room.map(RoomId))?;
        if rooms.is_empty() {
            if !global.quiet {
                eprintln!("No rooms available from {} to {}", self.start, self.end);
            }
            return Ok(());
        }

        println!("ID\tNAME");
        for room in rooms {
            println!("{}\t{}", room.id, room.name);
        }
        Ok(())
    }
}
