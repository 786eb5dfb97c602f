//! Half-open calendar date ranges.
//!
//! A stay covers the nights from `start` up to, but not including, `end`:
//! a guest arriving on the 1st and leaving on the 2nd occupies one night,
//! and a second guest may arrive on the 2nd without overlapping.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layout used for every date accepted from or printed to callers.
pub const DATE_LAYOUT: &str = "%Y-%m-%d";

/// A validated `[start, end)` date interval with `start < end`.
///
/// # Examples
///
/// ```
/// use bookings::StayRange;
///
/// let a = StayRange::parse("2030-01-01", "2030-01-03").unwrap();
/// let b = StayRange::parse("2030-01-03", "2030-01-05").unwrap();
/// assert_eq!(a.nights(), 2);
/// assert!(!a.overlaps(&b));
///
/// assert!(StayRange::parse("2030-01-03", "2030-01-03").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStayRange", into = "RawStayRange")]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RawStayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawStayRange> for StayRange {
    type Error = Error;

    fn try_from(raw: RawStayRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl From<StayRange> for RawStayRange {
    fn from(range: StayRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl StayRange {
    /// Creates a range, failing with [`Error::InvalidRange`] unless `start < end`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `start >= end`. Bounds are never swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(Error::InvalidRange { start, end })
        }
    }

    /// Parses both bounds in [`DATE_LAYOUT`] and builds the range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming `start_date` or `end_date` when a bound
    /// cannot be parsed, and `InvalidRange` when the bounds are out of order.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::new(start, end)
    }

    /// First night of the stay.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Departure date; not itself occupied.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights covered.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Half-open intersection test; touching boundaries do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns `true` if the night starting on `date` is inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Iterates over every occupied night.
    pub fn nights_iter(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_LAYOUT),
            self.end.format(DATE_LAYOUT)
        )
    }
}

/// Parses a single date in [`DATE_LAYOUT`], attributing failures to `field`.
///
/// # Errors
///
/// Returns `InvalidInput` for anything that is not a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_LAYOUT)
        .map_err(|e| Error::invalid_input(field, format!("cannot parse '{value}': {e}")))
}
