//! Availability queries over a [`Repository`].
//!
//! A room is available for `[start, end)` iff no restriction of any kind on
//! that room overlaps the range. The engine validates the range before it
//! touches storage and never turns a storage error into an answer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::Repository;
use crate::reservation::ReservationId;
use crate::room::{RestrictionId, RestrictionKind, Room, RoomId};
use crate::stay::StayRange;

#[cfg(test)]
mod proptests;

/// Per-night occupancy of one room over a window.
///
/// Nights covered by a reservation map to that reservation; nights covered
/// by an owner block map to the block's restriction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCalendar {
    /// The room shown.
    pub room: Room,
    /// The window shown.
    pub range: StayRange,
    /// Reserved nights.
    pub reserved: BTreeMap<NaiveDate, ReservationId>,
    /// Owner-blocked nights.
    pub blocked: BTreeMap<NaiveDate, RestrictionId>,
}

impl RoomCalendar {
    /// `true` if neither a reservation nor a block covers `night`.
    #[must_use]
    pub fn is_free(&self, night: NaiveDate) -> bool {
        !self.reserved.contains_key(&night) && !self.blocked.contains_key(&night)
    }

    /// Nights in the window that nothing occupies.
    pub fn free_nights(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.range.nights_iter().filter(|night| self.is_free(*night))
    }
}

/// Stateless availability queries borrowing a repository.
///
/// # Examples
///
/// ```
/// use bookings::{AvailabilityEngine, MemoryRepository, Repository};
/// use chrono::NaiveDate;
///
/// let repo = MemoryRepository::new();
/// let room = repo.insert_room("General's Quarters").unwrap();
///
/// let engine = AvailabilityEngine::new(&repo);
/// let start = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap();
/// assert!(engine.is_room_available(room, start, end).unwrap());
///
/// // Empty and reversed ranges are rejected before storage is queried
/// assert!(engine.is_room_available(room, end, start).is_err());
/// ```
#[derive(Debug)]
pub struct AvailabilityEngine<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> AvailabilityEngine<'a, R> {
    /// Creates an engine over `repo`.
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// `true` iff no restriction on `room_id` overlaps `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` unless `start < end`, and propagates storage
    /// failures.
    pub fn is_room_available(&self, room_id: RoomId, start: NaiveDate, end: NaiveDate) -> Result<bool> {
        let range = StayRange::new(start, end)?;
        let available = self
            .repo
            .search_availability_by_dates_by_room_id(room_id, &range)?;
        log::debug!("room {room_id} available for {range}: {available}");
        Ok(available)
    }

    /// Every room free for `[start, end)`, ordered by room id.
    ///
    /// An empty result means no room is free; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` unless `start < end`, and propagates storage
    /// failures.
    pub fn search_all_rooms(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Room>> {
        let range = StayRange::new(start, end)?;
        let rooms = self.repo.search_availability_for_all_rooms(&range)?;
        log::debug!("{} room(s) available for {range}", rooms.len());
        Ok(rooms)
    }

    /// Night-by-night occupancy of `room_id` over `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` unless `start < end`, `NotFound` if the room
    /// does not exist, and propagates storage failures.
    pub fn room_calendar(&self, room_id: RoomId, start: NaiveDate, end: NaiveDate) -> Result<RoomCalendar> {
        let range = StayRange::new(start, end)?;
        let room = self.repo.get_room_by_id(room_id)?;

        let mut calendar = RoomCalendar {
            room,
            range,
            reserved: BTreeMap::new(),
            blocked: BTreeMap::new(),
        };

        for restriction in self.repo.get_restrictions_for_room_by_date(room_id, &range)? {
            let nights = restriction
                .range
                .nights_iter()
                .filter(|night| range.contains(*night));
            match (restriction.kind, restriction.reservation_id) {
                (RestrictionKind::Reservation, Some(reservation)) => {
                    calendar.reserved.extend(nights.map(|night| (night, reservation)));
                }
                _ => {
                    calendar.blocked.extend(nights.map(|night| (night, restriction.id)));
                }
            }
        }

        Ok(calendar)
    }
}
