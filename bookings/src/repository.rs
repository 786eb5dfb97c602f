//! The storage-agnostic repository contract.
//!
//! [`Database`](crate::Database) implements it over SQLite and
//! [`MemoryRepository`](crate::MemoryRepository) implements it in memory.
//! Both must behave identically; `tests/repository_contract.rs` runs the same
//! suite against each.

use crate::error::Result;
use crate::reservation::{NewReservation, Reservation, ReservationId};
use crate::room::{NewRoomRestriction, RestrictionId, Room, RoomId, RoomRestriction};
use crate::stay::StayRange;
use crate::user::{NewUser, User, UserId};

/// Persistence operations the booking engine relies on.
///
/// Implementations are shared between concurrent callers and must not
/// require external locking. No operation may turn a storage failure into
/// a successful result.
pub trait Repository: Send + Sync {
    /// Adds a room and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a storage failure if the insert fails.
    fn insert_room(&self, name: &str) -> Result<RoomId>;

    /// All rooms, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a storage failure if the query fails.
    fn all_rooms(&self) -> Result<Vec<Room>>;

    /// Looks up a room.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such room exists.
    fn get_room_by_id(&self, id: RoomId) -> Result<Room>;

    /// Inserts a reservation row on its own, without a restriction.
    ///
    /// Bookings go through [`commit_booking`](Self::commit_booking); this is
    /// the primitive it is built from.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the room does not exist.
    fn insert_reservation(&self, reservation: &NewReservation) -> Result<ReservationId>;

    /// Inserts a restriction row.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if it overlaps an existing restriction on the same
    /// room, and `NotFound` if the room does not exist.
    fn insert_room_restriction(&self, restriction: &NewRoomRestriction) -> Result<RestrictionId>;

    /// Atomically re-checks availability, inserts the reservation, and
    /// inserts the restriction it owns.
    ///
    /// Either both rows persist or neither does.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the range is no longer free, `NotFound` if the
    /// room does not exist, or a storage failure.
    fn commit_booking(&self, reservation: &NewReservation) -> Result<ReservationId>;

    /// `true` iff no restriction on `room_id` overlaps `range`.
    ///
    /// # Errors
    ///
    /// Returns a storage failure if the query fails.
    fn search_availability_by_dates_by_room_id(
        &self,
        room_id: RoomId,
        range: &StayRange,
    ) -> Result<bool>;

    /// Every room with no overlapping restriction, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a storage failure if the query fails.
    fn search_availability_for_all_rooms(&self, range: &StayRange) -> Result<Vec<Room>>;

    /// Restrictions on `room_id` overlapping `range`, ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns a storage failure if the query fails.
    fn get_restrictions_for_room_by_date(
        &self,
        room_id: RoomId,
        range: &StayRange,
    ) -> Result<Vec<RoomRestriction>>;

    /// Removes an owner block.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such restriction exists and `InvalidInput`
    /// if it belongs to a reservation.
    fn delete_block(&self, id: RestrictionId) -> Result<()>;

    /// All reservations, ordered by start date then id.
    ///
    /// # Errors
    ///
    /// Returns a storage failure if the query fails.
    fn all_reservations(&self) -> Result<Vec<Reservation>>;

    /// Reservations not yet processed, ordered by start date then id.
    ///
    /// # Errors
    ///
    /// Returns a storage failure if the query fails.
    fn all_new_reservations(&self) -> Result<Vec<Reservation>>;

    /// Looks up a reservation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such reservation exists.
    fn get_reservation_by_id(&self, id: ReservationId) -> Result<Reservation>;

    /// Replaces the contact details of a stored reservation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such reservation exists.
    fn update_reservation(&self, reservation: &Reservation) -> Result<()>;

    /// Deletes a reservation and the restriction it owns.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such reservation exists.
    fn delete_reservation(&self, id: ReservationId) -> Result<()>;

    /// Marks a reservation processed (`true`) or new (`false`).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such reservation exists.
    fn update_processed_for_reservation(&self, id: ReservationId, processed: bool) -> Result<()>;

    /// Adds a user and returns their id.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is already registered.
    fn insert_user(&self, user: &NewUser) -> Result<UserId>;

    /// Looks up a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such user exists.
    fn get_user_by_id(&self, id: UserId) -> Result<User>;

    /// Replaces a user's name, email, and access level.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such user exists.
    fn update_user(&self, user: &User) -> Result<()>;

    /// Checks credentials, returning the user id and stored hash.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown email and for a wrong
    /// password alike.
    fn authenticate(&self, email: &str, password: &str) -> Result<(UserId, String)>;
}
