//! Error types for the bookings library.
//!
//! Every fallible operation in the crate returns [`Result`], and every
//! failure maps onto one [`ErrorKind`] so callers can branch on the category
//! without matching individual variants.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::forms::FormErrors;

/// Result type alias for operations that may fail with a bookings error.
///
/// # Examples
///
/// ```
/// use bookings::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(1)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the bookings library.
#[derive(Debug, Error)]
pub enum Error {
    /// A submitted field was missing or malformed.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A date range whose start is not strictly before its end.
    #[error("invalid date range {start} to {end}: start date must be before end date")]
    InvalidRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// Field-level validation failed; carries every recorded violation.
    #[error("validation failed for {} field(s)", .0.len())]
    ValidationFailed(FormErrors),

    /// The requested room, reservation, restriction, or user does not exist.
    #[error("not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// The requested dates are no longer available.
    #[error("booking conflict: {details}")]
    Conflict {
        /// Details about the conflict.
        details: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A non-SQL storage failure (decode errors, injected faults).
    #[error("storage failure: {details}")]
    Storage {
        /// Details about the failure.
        details: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration for '{field}': {message}")]
    InvalidConfig {
        /// The configuration field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Coarse error category, used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input, including bad date ranges.
    InvalidInput,
    /// Field-level business rule violations.
    ValidationFailed,
    /// Room, reservation, restriction, or user absent.
    NotFound,
    /// The availability race was lost.
    Conflict,
    /// Underlying storage or I/O failed.
    StorageFailure,
    /// Authentication failed.
    InvalidCredentials,
    /// Configuration could not be loaded or is invalid.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid input"),
            Self::ValidationFailed => write!(f, "validation failed"),
            Self::NotFound => write!(f, "not found"),
            Self::Conflict => write!(f, "conflict"),
            Self::StorageFailure => write!(f, "storage failure"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

impl Error {
    /// Returns the category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookings::{Error, ErrorKind};
    ///
    /// let err = Error::NotFound { resource: "room 7".to_string() };
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::InvalidRange { .. } => ErrorKind::InvalidInput,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Database(_) | Self::Storage { .. } | Self::Io(_) => ErrorKind::StorageFailure,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Configuration(_) | Self::InvalidConfig { .. } => ErrorKind::Configuration,
        }
    }

    /// Check if error indicates a missing record.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if error originates in the storage layer.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::StorageFailure)
    }

    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub(crate) fn storage(details: impl Into<String>) -> Self {
        Self::Storage {
            details: details.into(),
        }
    }

    pub(crate) fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
