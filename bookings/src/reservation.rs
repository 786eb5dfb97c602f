//! Reservation types.
//!
//! A [`NewReservation`] is what a caller hands to the repository; a
//! [`Reservation`] is what comes back once the row exists and has an id.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::room::RoomId;
use crate::stay::StayRange;

/// Identifier of a stored reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl ReservationId {
    /// Returns the underlying integer id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Guest contact details attached to a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Guest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone; may be empty.
    pub phone: String,
}

impl Guest {
    /// Creates a guest with every field trimmed.
    #[must_use]
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        email: impl AsRef<str>,
        phone: impl AsRef<str>,
    ) -> Self {
        Self {
            first_name: first_name.as_ref().trim().to_string(),
            last_name: last_name.as_ref().trim().to_string(),
            email: email.as_ref().trim().to_string(),
            phone: phone.as_ref().trim().to_string(),
        }
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Fails with `InvalidInput` on the first blank required field.
    pub(crate) fn check_required(&self) -> Result<()> {
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_input(field, "must not be blank"));
            }
        }
        Ok(())
    }
}

/// A reservation that has not been committed yet.
///
/// # Examples
///
/// ```
/// use bookings::{Guest, NewReservation, RoomId, StayRange};
///
/// let range = StayRange::parse("2030-01-01", "2030-01-02").unwrap();
/// let reservation = NewReservation::builder(RoomId(1), range)
///     .guest(Guest::new("Ada", "Lovelace", "ada@example.com", ""))
///     .build()
///     .unwrap();
/// assert_eq!(reservation.range().nights(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    room_id: RoomId,
    range: StayRange,
    guest: Guest,
}

impl NewReservation {
    /// Starts building a reservation for `room_id` over `range`.
    #[must_use]
    pub fn builder(room_id: RoomId, range: StayRange) -> NewReservationBuilder {
        NewReservationBuilder {
            room_id,
            range,
            guest: Guest::default(),
        }
    }

    /// Assembles a reservation without checking the guest; used for rows
    /// read back from storage.
    pub(crate) const fn from_parts(room_id: RoomId, range: StayRange, guest: Guest) -> Self {
        Self {
            room_id,
            range,
            guest,
        }
    }

    /// Booked room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Booked nights.
    #[must_use]
    pub const fn range(&self) -> StayRange {
        self.range
    }

    /// Guest contact details.
    #[must_use]
    pub const fn guest(&self) -> &Guest {
        &self.guest
    }
}

/// Builder for [`NewReservation`].
#[derive(Debug)]
pub struct NewReservationBuilder {
    room_id: RoomId,
    range: StayRange,
    guest: Guest,
}

impl NewReservationBuilder {
    /// Sets the guest contact details.
    #[must_use]
    pub fn guest(mut self, guest: Guest) -> Self {
        self.guest = guest;
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the first name, last name, or email is
    /// blank. Finer-grained rules belong to the form layer.
    pub fn build(self) -> Result<NewReservation> {
        self.guest.check_required()?;
        Ok(NewReservation::from_parts(self.room_id, self.range, self.guest))
    }
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    room_id: RoomId,
    range: StayRange,
    guest: Guest,
    processed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    pub(crate) fn from_parts(
        id: ReservationId,
        new: NewReservation,
        processed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_id: new.room_id,
            range: new.range,
            guest: new.guest,
            processed,
            created_at,
            updated_at,
        }
    }

    /// Reservation identity.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Booked room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Booked nights.
    #[must_use]
    pub const fn range(&self) -> StayRange {
        self.range
    }

    /// Arrival date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.range.start()
    }

    /// Departure date.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.range.end()
    }

    /// Guest contact details.
    #[must_use]
    pub const fn guest(&self) -> &Guest {
        &self.guest
    }

    /// Mutable access to the contact details, for [`update_reservation`].
    ///
    /// [`update_reservation`]: crate::Repository::update_reservation
    pub fn guest_mut(&mut self) -> &mut Guest {
        &mut self.guest
    }

    /// `false` while the reservation is new, `true` once processed.
    #[must_use]
    pub const fn processed(&self) -> bool {
        self.processed
    }

    /// When the reservation was committed.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the reservation was last changed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_processed(&mut self, processed: bool, at: DateTime<Utc>) {
        self.processed = processed;
        self.updated_at = at;
    }

    pub(crate) fn set_guest(&mut self, guest: Guest, at: DateTime<Utc>) {
        self.guest = guest;
        self.updated_at = at;
    }
}
