//! Calendar command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use bookings::stay::parse_date;
use bookings::{AvailabilityEngine, RoomId};
use clap::Args;

/// Show night-by-night occupancy of a room.
#[derive(Args)]
pub struct CalendarCommand {
    /// Room to show
    #[arg(long, value_name = "ID")]
    pub room: i64,

    /// First night shown (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Day after the last night shown (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: String,
}

impl CalendarCommand {
    /// Execute the calendar command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let start = parse_date("start", &self.start)?;
        let end = parse_date("end", &self.end)?;

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let calendar = AvailabilityEngine::new(&db).room_calendar(RoomId(self.room), start, end)?;

        if !global.quiet {
            println!("{} ({})", calendar.room.name, calendar.range);
        }
        println!("DATE\tSTATUS");
        for night in calendar.range.nights_iter() {
            let status = if let Some(reservation) = calendar.reserved.get(&night) {
                format!("reserved (reservation {reservation})")
            } else if let Some(block) = calendar.blocked.get(&night) {
                format!("blocked (restriction {block})")
            } else {
                "free".to_string()
            };
            println!("{}\t{status}", night.format("%Y-%m-%d"));
        }
        Ok(())
    }
}
