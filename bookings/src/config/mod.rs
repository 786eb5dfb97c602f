//! Configuration system for bookings.
//!
//! Configuration is merged from these sources, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`BOOKINGS_*`)
//! 3. `config.yaml` in the data directory
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use bookings::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let data_dir = Path::new("/srv/bookings");
//! let config = ConfigBuilder::new()
//!     .with_data_dir(data_dir)
//!     .build()
//!     .unwrap();
//!
//! println!("database: {}", config.database_path(data_dir).display());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::{EnvironmentConfig, BUSY_TIMEOUT_ENV, FIRST_NAME_MIN_LENGTH_ENV};
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{
    BookingSettings, Config, DatabaseSettings, DEFAULT_BUSY_TIMEOUT_MS,
    DEFAULT_FIRST_NAME_MIN_LENGTH,
};
pub use validator::ConfigValidator;
