//! Rooms and the restrictions that occupy them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reservation::ReservationId;
use crate::stay::StayRange;

/// Identifier of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl RoomId {
    /// Returns the underlying integer id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RoomId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| Error::invalid_input("room_id", format!("cannot parse '{s}': {e}")))
    }
}

/// Identifier of a room restriction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictionId(pub i64);

impl fmt::Display for RestrictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bookable room. Reference data, never owned by a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identity.
    pub id: RoomId,
    /// Display name, e.g. "General's Quarters".
    pub name: String,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
    /// When the room was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Why a room is unavailable for a span of nights.
///
/// Persisted as the integer id of the matching row in the `restrictions`
/// lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// Occupied by a guest reservation.
    Reservation,
    /// Blocked by the owner.
    OwnerBlock,
}

impl RestrictionKind {
    /// Id of the lookup row for this kind.
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Reservation => 1,
            Self::OwnerBlock => 2,
        }
    }

    /// Resolves a lookup id back to a kind.
    ///
    /// # Errors
    ///
    /// Returns a storage failure for ids that do not exist in the lookup table.
    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            1 => Ok(Self::Reservation),
            2 => Ok(Self::OwnerBlock),
            other => Err(Error::storage(format!("unknown restriction kind {other}"))),
        }
    }

    /// Display name stored in the lookup table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reservation => "Reservation",
            Self::OwnerBlock => "Owner Block",
        }
    }
}

impl fmt::Display for RestrictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored restriction: a room occupied over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRestriction {
    /// Restriction identity.
    pub id: RestrictionId,
    /// Occupied room.
    pub room_id: RoomId,
    /// Owning reservation; `None` for owner blocks.
    pub reservation_id: Option<ReservationId>,
    /// Occupied nights.
    pub range: StayRange,
    /// Reservation or owner block.
    pub kind: RestrictionKind,
}

impl RoomRestriction {
    /// First occupied night.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.range.start()
    }

    /// Departure date.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.range.end()
    }
}

/// A restriction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoomRestriction {
    /// Room to occupy.
    pub room_id: RoomId,
    /// Owning reservation, if any.
    pub reservation_id: Option<ReservationId>,
    /// Nights to occupy.
    pub range: StayRange,
    /// Reservation or owner block.
    pub kind: RestrictionKind,
}

impl NewRoomRestriction {
    /// An owner block over `range`.
    #[must_use]
    pub const fn owner_block(room_id: RoomId, range: StayRange) -> Self {
        Self {
            room_id,
            reservation_id: None,
            range,
            kind: RestrictionKind::OwnerBlock,
        }
    }

    /// The restriction a committed reservation owns.
    #[must_use]
    pub const fn for_reservation(
        room_id: RoomId,
        reservation_id: ReservationId,
        range: StayRange,
    ) -> Self {
        Self {
            room_id,
            reservation_id: Some(reservation_id),
            range,
            kind: RestrictionKind::Reservation,
        }
    }
}
