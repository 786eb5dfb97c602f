//! In-memory [`Repository`] with fault injection.
//!
//! `MemoryRepository` mirrors the `SQLite` backend's observable behaviour
//! without touching disk. A [`FaultPlan`] makes chosen operations fail with a
//! storage error so callers' failure paths can be exercised.
//!
//! # Examples
//!
//! ```
//! use bookings::{FaultPlan, MemoryRepository, Repository, RoomId, StayRange};
//!
//! let repo = MemoryRepository::with_faults(FaultPlan::new().fail_restriction_inserts(RoomId(1)));
//! let room = repo.insert_room("General's Quarters").unwrap();
//!
//! let range = StayRange::parse("2030-01-01", "2030-01-02").unwrap();
//! assert!(repo.search_availability_by_dates_by_room_id(room, &range).unwrap());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::repository::Repository;
use crate::reservation::{NewReservation, Reservation, ReservationId};
use crate::room::{NewRoomRestriction, RestrictionId, RestrictionKind, Room, RoomId, RoomRestriction};
use crate::stay::StayRange;
use crate::user::{check_credentials, normalize_email, NewUser, User, UserId};

/// Operations a [`MemoryRepository`] should fail on purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    reservation_inserts: BTreeSet<RoomId>,
    restriction_inserts: BTreeSet<RoomId>,
    availability_starts: BTreeSet<NaiveDate>,
}

impl FaultPlan {
    /// A plan that injects nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails reservation inserts for `room_id`.
    #[must_use]
    pub fn fail_reservation_inserts(mut self, room_id: RoomId) -> Self {
        self.reservation_inserts.insert(room_id);
        self
    }

    /// Fails restriction inserts for `room_id`, including the one made by
    /// `commit_booking` after its reservation insert.
    #[must_use]
    pub fn fail_restriction_inserts(mut self, room_id: RoomId) -> Self {
        self.restriction_inserts.insert(room_id);
        self
    }

    /// Fails availability queries whose range starts on `start`.
    #[must_use]
    pub fn fail_availability_from(mut self, start: NaiveDate) -> Self {
        self.availability_starts.insert(start);
        self
    }

    fn check_reservation_insert(&self, room_id: RoomId) -> Result<()> {
        if self.reservation_inserts.contains(&room_id) {
            return Err(Error::storage(format!(
                "injected failure inserting reservation for room {room_id}"
            )));
        }
        Ok(())
    }

    fn check_restriction_insert(&self, room_id: RoomId) -> Result<()> {
        if self.restriction_inserts.contains(&room_id) {
            return Err(Error::storage(format!(
                "injected failure inserting restriction for room {room_id}"
            )));
        }
        Ok(())
    }

    fn check_availability(&self, range: &StayRange) -> Result<()> {
        if self.availability_starts.contains(&range.start()) {
            return Err(Error::storage(format!(
                "injected failure querying availability for {range}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct State {
    rooms: BTreeMap<RoomId, Room>,
    reservations: BTreeMap<ReservationId, Reservation>,
    restrictions: BTreeMap<RestrictionId, RoomRestriction>,
    users: BTreeMap<UserId, User>,
    sequences: [i64; 4],
}

/// Per-table id sequences, numbered from 1 like `AUTOINCREMENT` columns.
#[derive(Clone, Copy)]
enum Table {
    Rooms,
    Reservations,
    Restrictions,
    Users,
}

impl State {
    fn next_id(&mut self, table: Table) -> i64 {
        let seq = &mut self.sequences[table as usize];
        *seq += 1;
        *seq
    }

    fn ensure_room(&self, room_id: RoomId) -> Result<()> {
        if self.rooms.contains_key(&room_id) {
            Ok(())
        } else {
            Err(Error::not_found(format!("room {room_id}")))
        }
    }

    fn is_free(&self, room_id: RoomId, range: &StayRange) -> bool {
        !self
            .restrictions
            .values()
            .any(|r| r.room_id == room_id && r.range.overlaps(range))
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn push_restriction(&mut self, new: &NewRoomRestriction) -> RestrictionId {
        let id = RestrictionId(self.next_id(Table::Restrictions));
        self.restrictions.insert(
            id,
            RoomRestriction {
                id,
                room_id: new.room_id,
                reservation_id: new.reservation_id,
                range: new.range,
                kind: new.kind,
            },
        );
        id
    }

    fn sorted_reservations(&self, only_new: bool) -> Vec<Reservation> {
        let mut out: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| !only_new || !r.processed())
            .cloned()
            .collect();
        out.sort_by_key(|r| (r.start_date(), r.id()));
        out
    }
}

/// Timestamps are kept at whole seconds, as the `SQLite` backend stores them.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// A [`Repository`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
    faults: RwLock<FaultPlan>,
}

impl MemoryRepository {
    /// Creates an empty repository with no injected faults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty repository that injects `faults`.
    #[must_use]
    pub fn with_faults(faults: FaultPlan) -> Self {
        Self {
            state: RwLock::default(),
            faults: RwLock::new(faults),
        }
    }

    /// Replaces the fault plan.
    pub fn set_faults(&self, faults: FaultPlan) {
        *self.faults.write() = faults;
    }
}

impl Repository for MemoryRepository {
    fn insert_room(&self, name: &str) -> Result<RoomId> {
        let mut state = self.state.write();
        let id = RoomId(state.next_id(Table::Rooms));
        let at = now();
        state.rooms.insert(
            id,
            Room {
                id,
                name: name.to_string(),
                created_at: at,
                updated_at: at,
            },
        );
        Ok(id)
    }

    fn all_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.state.read().rooms.values().cloned().collect())
    }

    fn get_room_by_id(&self, id: RoomId) -> Result<Room> {
        self.state
            .read()
            .rooms
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("room {id}")))
    }

    fn insert_reservation(&self, reservation: &NewReservation) -> Result<ReservationId> {
        let mut state = self.state.write();
        state.ensure_room(reservation.room_id())?;
        self.faults
            .read()
            .check_reservation_insert(reservation.room_id())?;

        let id = ReservationId(state.next_id(Table::Reservations));
        let at = now();
        state.reservations.insert(
            id,
            Reservation::from_parts(id, reservation.clone(), false, at, at),
        );
        Ok(id)
    }

    fn insert_room_restriction(&self, restriction: &NewRoomRestriction) -> Result<RestrictionId> {
        let mut state = self.state.write();
        state.ensure_room(restriction.room_id)?;
        if let Some(owner) = restriction.reservation_id {
            if !state.reservations.contains_key(&owner) {
                return Err(Error::not_found(format!("reservation {owner}")));
            }
        }
        self.faults
            .read()
            .check_restriction_insert(restriction.room_id)?;
        if !state.is_free(restriction.room_id, &restriction.range) {
            return Err(Error::Conflict {
                details: "room restriction overlaps an existing restriction".into(),
            });
        }
        Ok(state.push_restriction(restriction))
    }

    fn commit_booking(&self, reservation: &NewReservation) -> Result<ReservationId> {
        let room_id = reservation.room_id();
        let range = reservation.range();

        let mut state = self.state.write();
        state.ensure_room(room_id)?;
        if !state.is_free(room_id, &range) {
            return Err(Error::Conflict {
                details: format!("room {room_id} is no longer available for {range}"),
            });
        }

        // Both inserts are checked before either is applied, so a failed
        // restriction leaves no reservation behind.
        {
            let faults = self.faults.read();
            faults.check_reservation_insert(room_id)?;
            faults.check_restriction_insert(room_id)?;
        }

        let id = ReservationId(state.next_id(Table::Reservations));
        let at = now();
        state.reservations.insert(
            id,
            Reservation::from_parts(id, reservation.clone(), false, at, at),
        );
        state.push_restriction(&NewRoomRestriction::for_reservation(room_id, id, range));

        log::info!("booked room {room_id} for {range} as reservation {id}");
        Ok(id)
    }

    fn search_availability_by_dates_by_room_id(
        &self,
        room_id: RoomId,
        range: &StayRange,
    ) -> Result<bool> {
        self.faults.read().check_availability(range)?;
        Ok(self.state.read().is_free(room_id, range))
    }

    fn search_availability_for_all_rooms(&self, range: &StayRange) -> Result<Vec<Room>> {
        self.faults.read().check_availability(range)?;
        let state = self.state.read();
        Ok(state
            .rooms
            .values()
            .filter(|room| state.is_free(room.id, range))
            .cloned()
            .collect())
    }

    fn get_restrictions_for_room_by_date(
        &self,
        room_id: RoomId,
        range: &StayRange,
    ) -> Result<Vec<RoomRestriction>> {
        let state = self.state.read();
        let mut out: Vec<RoomRestriction> = state
            .restrictions
            .values()
            .filter(|r| r.room_id == room_id && r.range.overlaps(range))
            .cloned()
            .collect();
        out.sort_by_key(|r| (r.start_date(), r.id.0));
        Ok(out)
    }

    fn delete_block(&self, id: RestrictionId) -> Result<()> {
        let mut state = self.state.write();
        match state.restrictions.get(&id).map(|r| r.kind) {
            None => Err(Error::not_found(format!("restriction {id}"))),
            Some(RestrictionKind::Reservation) => Err(Error::invalid_input(
                "restriction_id",
                "belongs to a reservation; delete the reservation instead",
            )),
            Some(RestrictionKind::OwnerBlock) => {
                state.restrictions.remove(&id);
                Ok(())
            }
        }
    }

    fn all_reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.state.read().sorted_reservations(false))
    }

    fn all_new_reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.state.read().sorted_reservations(true))
    }

    fn get_reservation_by_id(&self, id: ReservationId) -> Result<Reservation> {
        self.state
            .read()
            .reservations
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("reservation {id}")))
    }

    fn update_reservation(&self, reservation: &Reservation) -> Result<()> {
        reservation.guest().check_required()?;

        let mut state = self.state.write();
        let stored = state
            .reservations
            .get_mut(&reservation.id())
            .ok_or_else(|| Error::not_found(format!("reservation {}", reservation.id())))?;
        stored.set_guest(reservation.guest().clone(), now());
        Ok(())
    }

    fn delete_reservation(&self, id: ReservationId) -> Result<()> {
        let mut state = self.state.write();
        if state.reservations.remove(&id).is_none() {
            return Err(Error::not_found(format!("reservation {id}")));
        }
        state.restrictions.retain(|_, r| r.reservation_id != Some(id));
        Ok(())
    }

    fn update_processed_for_reservation(&self, id: ReservationId, processed: bool) -> Result<()> {
        let mut state = self.state.write();
        let stored = state
            .reservations
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("reservation {id}")))?;
        stored.set_processed(processed, now());
        Ok(())
    }

    fn insert_user(&self, user: &NewUser) -> Result<UserId> {
        let mut state = self.state.write();
        let email = normalize_email(&user.email);
        if state.email_taken(&email, None) {
            return Err(Error::Conflict {
                details: "user email already exists".into(),
            });
        }

        let id = UserId(state.next_id(Table::Users));
        let at = now();
        state.users.insert(
            id,
            User {
                id,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email,
                password_hash: user.password_hash.clone(),
                access_level: user.access_level,
                created_at: at,
                updated_at: at,
            },
        );
        Ok(id)
    }

    fn get_user_by_id(&self, id: UserId) -> Result<User> {
        self.state
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("user {id}")))
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut state = self.state.write();
        let email = normalize_email(&user.email);
        if !state.users.contains_key(&user.id) {
            return Err(Error::not_found(format!("user {}", user.id)));
        }
        if state.email_taken(&email, Some(user.id)) {
            return Err(Error::Conflict {
                details: "user email already exists".into(),
            });
        }

        if let Some(stored) = state.users.get_mut(&user.id) {
            stored.first_name.clone_from(&user.first_name);
            stored.last_name.clone_from(&user.last_name);
            stored.email = email;
            stored.access_level = user.access_level;
            stored.updated_at = now();
        }
        Ok(())
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<(UserId, String)> {
        let email = normalize_email(email);
        let stored = self
            .state
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| (u.id, u.password_hash.clone()));
        check_credentials(password, stored)
    }
}
