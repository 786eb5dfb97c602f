//! Add-room command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;

/// Add one or more rooms.
#[derive(Args)]
pub struct AddRoomCommand {
    /// Room names
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,
}

impl AddRoomCommand {
    /// Execute the add-room command.
    ///
    /// All rooms are inserted in one transaction.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if let Some(blank) = self.names.iter().find(|n| n.trim().is_empty()) {
            return Err(CliError::InvalidArguments(format!(
                "room name must not be blank: '{blank}'"
            )));
        }

        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let names: Vec<&str> = self.names.iter().map(|n| n.trim()).collect();
        let ids = db.insert_rooms(&names)?;

        if !global.quiet {
            for (id, name) in ids.iter().zip(&names) {
                println!("Added room {id}: {name}");
            }
        }
        Ok(())
    }
}
