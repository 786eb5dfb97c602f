//! Book command implementation.
//!
//! Runs the full stage and confirm flow for a single guest. Contact
//! details go through the same validation a booking form would.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use bookings::{BookingOrchestrator, BookingSession, ConfirmOutcome, Error, FormData};
use clap::Args;

/// Book a room for a guest.
#[derive(Args)]
pub struct BookCommand {
    /// Room to book
    #[arg(long, value_name = "ID")]
    pub room: String,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Departure date (YYYY-MM-DD), exclusive
    #[arg(long, value_name = "DATE")]
    pub end: String,

    /// Guest first name
    #[arg(long)]
    pub first_name: String,

    /// Guest last name
    #[arg(long)]
    pub last_name: String,

    /// Guest email address
    #[arg(long)]
    pub email: String,

    /// Guest phone number
    #[arg(long, default_value = "")]
    pub phone: String,
}

impl BookCommand {
    fn form_data(&self) -> FormData {
        [
            ("room_id", self.room.as_str()),
            ("start_date", self.start.as_str()),
            ("end_date", self.end.as_str()),
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
        ]
        .into_iter()
        .collect()
    }

    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;
        let orchestrator = BookingOrchestrator::new(&db, config.booking_rules());
        let mut session = BookingSession::default();

        match orchestrator.book_from_form(&mut session, &self.form_data())? {
            ConfirmOutcome::Confirmed(confirmation) => {
                if global.quiet {
                    println!("{}", confirmation.reservation_id);
                } else {
                    println!(
                        "Confirmed reservation {} for {} in {} ({}, {} night(s))",
                        confirmation.reservation_id,
                        confirmation.guest.full_name(),
                        confirmation.room.name,
                        confirmation.range,
                        confirmation.range.nights()
                    );
                }
                Ok(())
            }
            ConfirmOutcome::Invalid { errors, .. } => {
                for field in errors.fields() {
                    for message in errors.all(field) {
                        eprintln!("{field}: {message}");
                    }
                }
                Err(Error::ValidationFailed(errors).into())
            }
        }
    }
}
