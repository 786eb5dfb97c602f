//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV).

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use bookings::{Repository, Reservation};
use clap::{Args, ValueEnum};
use std::io::Write;

/// Column headers for CSV output.
const COLUMN_HEADERS: [&str; 10] = [
    "id",
    "room_id",
    "start_date",
    "end_date",
    "first_name",
    "last_name",
    "email",
    "phone",
    "processed",
    "created_at",
];

/// List reservations, ordered by arrival date.
#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "table", ignore_case = true)]
    pub format: OutputFormat,

    /// Only show reservations not yet processed
    #[arg(long)]
    pub new: bool,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let reservations = if self.new {
            db.all_new_reservations()?
        } else {
            db.all_reservations()?
        };

        match self.format {
            OutputFormat::Table => format_as_table(&reservations),
            OutputFormat::Json => format_as_json(&reservations),
            OutputFormat::Csv => format_as_csv(&reservations),
        }
    }
}

fn fields(res: &Reservation) -> [String; 10] {
    [
        res.id().to_string(),
        res.room_id().to_string(),
        res.start_date().format("%Y-%m-%d").to_string(),
        res.end_date().format("%Y-%m-%d").to_string(),
        res.guest().first_name.clone(),
        res.guest().last_name.clone(),
        res.guest().email.clone(),
        res.guest().phone.clone(),
        res.processed().to_string(),
        format_timestamp(res.created_at()),
    ]
}

/// Format reservations as a human-readable table.
fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for res in reservations {
        let mut row = fields(res);
        if row[7].is_empty() {
            row[7] = "-".to_string();
        }
        writeln!(handle, "{}", row.join("\t"))?;
    }

    Ok(())
}

/// Format reservations as JSON.
fn format_as_json(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = reservations
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id(),
                "room_id": r.room_id(),
                "start_date": r.start_date(),
                "end_date": r.end_date(),
                "first_name": r.guest().first_name,
                "last_name": r.guest().last_name,
                "email": r.guest().email,
                "phone": r.guest().phone,
                "processed": r.processed(),
                "created_at": format_timestamp(r.created_at()),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    writeln!(handle)?;

    Ok(())
}

/// Convert `csv::Error` to `CliError`.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// Format reservations as CSV.
fn format_as_csv(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::Writer::from_writer(handle);

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;
    for res in reservations {
        writer.write_record(fields(res)).map_err(csv_error)?;
    }
    writer.flush()?;

    Ok(())
}
