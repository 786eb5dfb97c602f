//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the bookings data directory and database.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, resolve_data_dir, GlobalOptions};
use bookings::config::CONFIG_FILE_NAME;
use clap::Parser;
use std::fs;

/// Default configuration written by `init --with-config`.
const DEFAULT_CONFIG: &str = "\
# bookings configuration
database:
  busy_timeout_ms: 5000
booking:
  first_name_min_length: 3
";

/// Initialize the bookings data directory and database.
#[derive(Parser)]
pub struct InitCommand {
    /// Create a default configuration file
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let write_config = self.with_config && !config_path.exists();

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize bookings in: {}", data_dir.display());
            if !data_dir.exists() {
                println!("  - Create data directory");
            }
            if write_config {
                println!("  - Create configuration file: {}", config_path.display());
            }
            return Ok(());
        }

        let created_dir = !data_dir.exists();
        fs::create_dir_all(&data_dir)?;

        if write_config {
            fs::write(&config_path, DEFAULT_CONFIG)?;
        }

        let config = load_configuration(global)?;
        let db_path = config.database_path(&data_dir);
        let created_db = !db_path.exists();
        open_database(global, &config)?;

        if global.quiet {
            return Ok(());
        }

        println!("Initialized bookings in: {}", data_dir.display());
        if created_dir {
            println!("  - Created data directory");
        }
        if created_db {
            println!("  - Created database: {}", db_path.display());
        } else {
            println!("  - Database already exists: {}", db_path.display());
        }
        if write_config {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        Ok(())
    }
}
