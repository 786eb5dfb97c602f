//! Row-level reads and writes, and the [`Repository`] implementation.
//!
//! The free functions here take a plain `&Connection` so the transactional
//! paths in `transaction.rs` can run them inside an open transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use crate::error::{Error, Result};
use crate::repository::Repository;
use crate::reservation::{Guest, NewReservation, Reservation, ReservationId};
use crate::room::{NewRoomRestriction, RestrictionId, RestrictionKind, Room, RoomId, RoomRestriction};
use crate::stay::{StayRange, DATE_LAYOUT};
use crate::user::{check_credentials, normalize_email, NewUser, User, UserId};

use super::connection::Database;
use super::schema::{
    COUNT_OVERLAPPING, INSERT_RESERVATION, INSERT_ROOM, INSERT_ROOM_RESTRICTION, OVERLAP_MESSAGE,
    ROOM_EXISTS,
};
use super::transaction;

const SELECT_ROOMS: &str = "SELECT id, room_name, created_at, updated_at FROM rooms ORDER BY id";

const SELECT_ROOM: &str = "SELECT id, room_name, created_at, updated_at FROM rooms WHERE id = ?";

// Parameters: end, start
const SELECT_AVAILABLE_ROOMS: &str = r"
    SELECT r.id, r.room_name, r.created_at, r.updated_at
    FROM rooms r
    WHERE r.id NOT IN (
        SELECT rr.room_id FROM room_restrictions rr
        WHERE rr.start_date < ? AND rr.end_date > ?
    )
    ORDER BY r.id
";

// Parameters: room_id, end, start
const SELECT_RESTRICTIONS_FOR_ROOM: &str = r"
    SELECT id, room_id, reservation_id, start_date, end_date, restriction_id
    FROM room_restrictions
    WHERE room_id = ? AND start_date < ? AND end_date > ?
    ORDER BY start_date, id
";

const SELECT_RESTRICTION_KIND: &str = "SELECT restriction_id FROM room_restrictions WHERE id = ?";

const DELETE_RESTRICTION: &str = "DELETE FROM room_restrictions WHERE id = ?";

const SELECT_RESERVATIONS: &str = r"
    SELECT id, first_name, last_name, email, phone, start_date, end_date, room_id,
           processed, created_at, updated_at
    FROM reservations
    ORDER BY start_date, id
";

const SELECT_NEW_RESERVATIONS: &str = r"
    SELECT id, first_name, last_name, email, phone, start_date, end_date, room_id,
           processed, created_at, updated_at
    FROM reservations
    WHERE processed = 0
    ORDER BY start_date, id
";

const SELECT_RESERVATION: &str = r"
    SELECT id, first_name, last_name, email, phone, start_date, end_date, room_id,
           processed, created_at, updated_at
    FROM reservations
    WHERE id = ?
";

const UPDATE_RESERVATION: &str = r"
    UPDATE reservations
    SET first_name = ?, last_name = ?, email = ?, phone = ?, updated_at = ?
    WHERE id = ?
";

const UPDATE_PROCESSED: &str =
    "UPDATE reservations SET processed = ?, updated_at = ? WHERE id = ?";

const INSERT_USER: &str = r"
    INSERT INTO users
    (first_name, last_name, email, password, access_level, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const SELECT_USER: &str = r"
    SELECT id, first_name, last_name, email, password, access_level, created_at, updated_at
    FROM users
    WHERE id = ?
";

const UPDATE_USER: &str = r"
    UPDATE users
    SET first_name = ?, last_name = ?, email = ?, access_level = ?, updated_at = ?
    WHERE id = ?
";

const SELECT_CREDENTIALS: &str = "SELECT id, password FROM users WHERE email = ?";

/// Current time as Unix epoch seconds.
pub(super) fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Formats a date for storage.
pub(super) fn date_text(date: NaiveDate) -> String {
    date.format(DATE_LAYOUT).to_string()
}

fn conversion_failure(e: Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

fn secs_to_datetime(secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| conversion_failure(Error::storage(format!("timestamp {secs} out of range"))))
}

fn row_range(row: &rusqlite::Row<'_>, start: usize, end: usize) -> rusqlite::Result<StayRange> {
    let start: String = row.get(start)?;
    let end: String = row.get(end)?;
    StayRange::parse(&start, &end).map_err(conversion_failure)
}

/// Expects: id, `room_name`, `created_at`, `updated_at`
fn row_to_room(row: &rusqlite::Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: RoomId(row.get(0)?),
        name: row.get(1)?,
        created_at: secs_to_datetime(row.get(2)?)?,
        updated_at: secs_to_datetime(row.get(3)?)?,
    })
}

/// Expects: id, `room_id`, `reservation_id`, `start_date`, `end_date`, `restriction_id`
fn row_to_restriction(row: &rusqlite::Row<'_>) -> rusqlite::Result<RoomRestriction> {
    let reservation_id: Option<i64> = row.get(2)?;
    let kind = RestrictionKind::from_id(row.get(5)?).map_err(conversion_failure)?;
    Ok(RoomRestriction {
        id: RestrictionId(row.get(0)?),
        room_id: RoomId(row.get(1)?),
        reservation_id: reservation_id.map(ReservationId),
        range: row_range(row, 3, 4)?,
        kind,
    })
}

/// Expects the column order of `SELECT_RESERVATIONS`.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let guest = Guest {
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
    };
    let range = row_range(row, 5, 6)?;
    let room_id = RoomId(row.get(7)?);

    Ok(Reservation::from_parts(
        ReservationId(row.get(0)?),
        NewReservation::from_parts(room_id, range, guest),
        row.get(8)?,
        secs_to_datetime(row.get(9)?)?,
        secs_to_datetime(row.get(10)?)?,
    ))
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        access_level: row.get(5)?,
        created_at: secs_to_datetime(row.get(6)?)?,
        updated_at: secs_to_datetime(row.get(7)?)?,
    })
}

/// Maps a failed write onto the crate's error categories.
///
/// The overlap trigger and a duplicate user email become `Conflict`, a
/// dangling foreign key becomes `NotFound`, and anything else stays a
/// storage failure.
pub(super) fn classify_write_error(err: rusqlite::Error, what: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            let message = message.as_deref().unwrap_or_default();
            if message.contains(OVERLAP_MESSAGE) {
                return Error::Conflict {
                    details: format!("{what} overlaps an existing restriction"),
                };
            }
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Error::not_found(format!("record referenced by {what}"));
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    return Error::Conflict {
                        details: format!("{what} already exists"),
                    };
                }
                _ => {}
            }
        }
    }
    Error::Database(err)
}

/// Fails with `NotFound` unless the room exists.
pub(super) fn ensure_room_exists(conn: &Connection, room_id: RoomId) -> Result<()> {
    let exists: bool = conn.query_row(ROOM_EXISTS, [room_id.value()], |row| row.get(0))?;
    if exists {
        Ok(())
    } else {
        Err(Error::not_found(format!("room {room_id}")))
    }
}

/// Number of restrictions on `room_id` overlapping `range`.
pub(super) fn count_overlapping(conn: &Connection, room_id: RoomId, range: &StayRange) -> Result<i64> {
    Ok(conn.query_row(
        COUNT_OVERLAPPING,
        params![room_id.value(), date_text(range.end()), date_text(range.start())],
        |row| row.get(0),
    )?)
}

pub(super) fn insert_room_row(conn: &Connection, name: &str, now: i64) -> Result<RoomId> {
    conn.execute(INSERT_ROOM, params![name, now, now])
        .map_err(|e| classify_write_error(e, "room"))?;
    Ok(RoomId(conn.last_insert_rowid()))
}

pub(super) fn insert_reservation_row(
    conn: &Connection,
    reservation: &NewReservation,
    now: i64,
) -> Result<ReservationId> {
    let guest = reservation.guest();
    let range = reservation.range();
    conn.execute(
        INSERT_RESERVATION,
        params![
            guest.first_name,
            guest.last_name,
            guest.email,
            guest.phone,
            date_text(range.start()),
            date_text(range.end()),
            reservation.room_id().value(),
            now,
            now,
        ],
    )
    .map_err(|e| classify_write_error(e, "reservation"))?;
    Ok(ReservationId(conn.last_insert_rowid()))
}

pub(super) fn insert_restriction_row(
    conn: &Connection,
    restriction: &NewRoomRestriction,
    now: i64,
) -> Result<RestrictionId> {
    conn.execute(
        INSERT_ROOM_RESTRICTION,
        params![
            date_text(restriction.range.start()),
            date_text(restriction.range.end()),
            restriction.room_id.value(),
            restriction.reservation_id.map(ReservationId::value),
            restriction.kind.id(),
            now,
            now,
        ],
    )
    .map_err(|e| classify_write_error(e, "room restriction"))?;
    Ok(RestrictionId(conn.last_insert_rowid()))
}

fn select_reservations(conn: &Connection, sql: &str) -> Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], row_to_reservation)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

impl Repository for Database {
    fn insert_room(&self, name: &str) -> Result<RoomId> {
        let conn = self.conn.lock();
        let id = insert_room_row(&conn, name, now_secs())?;
        log::debug!("inserted room {id} '{name}'");
        Ok(id)
    }

    fn all_rooms(&self) -> Result<Vec<Room>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_ROOMS)?;
        let rows = stmt.query_map([], row_to_room)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_room_by_id(&self, id: RoomId) -> Result<Room> {
        let conn = self.conn.lock();
        conn.query_row(SELECT_ROOM, [id.value()], row_to_room)
            .optional()?
            .ok_or_else(|| Error::not_found(format!("room {id}")))
    }

    fn insert_reservation(&self, reservation: &NewReservation) -> Result<ReservationId> {
        let conn = self.conn.lock();
        ensure_room_exists(&conn, reservation.room_id())?;
        insert_reservation_row(&conn, reservation, now_secs())
    }

    fn insert_room_restriction(&self, restriction: &NewRoomRestriction) -> Result<RestrictionId> {
        let conn = self.conn.lock();
        ensure_room_exists(&conn, restriction.room_id)?;
        let id = insert_restriction_row(&conn, restriction, now_secs())?;
        log::debug!(
            "inserted {} restriction {} on room {} for {}",
            restriction.kind.name(),
            id.0,
            restriction.room_id,
            restriction.range
        );
        Ok(id)
    }

    fn commit_booking(&self, reservation: &NewReservation) -> Result<ReservationId> {
        let mut conn = self.conn.lock();
        transaction::commit_booking(&mut conn, reservation)
    }

    fn search_availability_by_dates_by_room_id(
        &self,
        room_id: RoomId,
        range: &StayRange,
    ) -> Result<bool> {
        let conn = self.conn.lock();
        Ok(count_overlapping(&conn, room_id, range)? == 0)
    }

    fn search_availability_for_all_rooms(&self, range: &StayRange) -> Result<Vec<Room>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_AVAILABLE_ROOMS)?;
        let rows = stmt.query_map(
            params![date_text(range.end()), date_text(range.start())],
            row_to_room,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_restrictions_for_room_by_date(
        &self,
        room_id: RoomId,
        range: &StayRange,
    ) -> Result<Vec<RoomRestriction>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_RESTRICTIONS_FOR_ROOM)?;
        let rows = stmt.query_map(
            params![
                room_id.value(),
                date_text(range.end()),
                date_text(range.start())
            ],
            row_to_restriction,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn delete_block(&self, id: RestrictionId) -> Result<()> {
        let conn = self.conn.lock();
        let kind: Option<i64> = conn
            .query_row(SELECT_RESTRICTION_KIND, [id.0], |row| row.get(0))
            .optional()?;

        match kind.map(RestrictionKind::from_id).transpose()? {
            None => Err(Error::not_found(format!("restriction {}", id.0))),
            Some(RestrictionKind::Reservation) => Err(Error::invalid_input(
                "restriction_id",
                "belongs to a reservation; delete the reservation instead",
            )),
            Some(RestrictionKind::OwnerBlock) => {
                conn.execute(DELETE_RESTRICTION, [id.0])?;
                log::debug!("deleted owner block {}", id.0);
                Ok(())
            }
        }
    }

    fn all_reservations(&self) -> Result<Vec<Reservation>> {
        select_reservations(&self.conn.lock(), SELECT_RESERVATIONS)
    }

    fn all_new_reservations(&self) -> Result<Vec<Reservation>> {
        select_reservations(&self.conn.lock(), SELECT_NEW_RESERVATIONS)
    }

    fn get_reservation_by_id(&self, id: ReservationId) -> Result<Reservation> {
        let conn = self.conn.lock();
        conn.query_row(SELECT_RESERVATION, [id.value()], row_to_reservation)
            .optional()?
            .ok_or_else(|| Error::not_found(format!("reservation {id}")))
    }

    fn update_reservation(&self, reservation: &Reservation) -> Result<()> {
        let guest = reservation.guest();
        guest.check_required()?;

        let conn = self.conn.lock();
        let updated = conn.execute(
            UPDATE_RESERVATION,
            params![
                guest.first_name,
                guest.last_name,
                guest.email,
                guest.phone,
                now_secs(),
                reservation.id().value(),
            ],
        )?;
        if updated == 0 {
            return Err(Error::not_found(format!("reservation {}", reservation.id())));
        }
        Ok(())
    }

    fn delete_reservation(&self, id: ReservationId) -> Result<()> {
        let mut conn = self.conn.lock();
        transaction::delete_reservation(&mut conn, id)
    }

    fn update_processed_for_reservation(&self, id: ReservationId, processed: bool) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn.execute(UPDATE_PROCESSED, params![processed, now_secs(), id.value()])?;
        if updated == 0 {
            return Err(Error::not_found(format!("reservation {id}")));
        }
        Ok(())
    }

    fn insert_user(&self, user: &NewUser) -> Result<UserId> {
        let conn = self.conn.lock();
        let now = now_secs();
        conn.execute(
            INSERT_USER,
            params![
                user.first_name,
                user.last_name,
                normalize_email(&user.email),
                user.password_hash,
                user.access_level,
                now,
                now,
            ],
        )
        .map_err(|e| classify_write_error(e, "user email"))?;
        Ok(UserId(conn.last_insert_rowid()))
    }

    fn get_user_by_id(&self, id: UserId) -> Result<User> {
        let conn = self.conn.lock();
        conn.query_row(SELECT_USER, [id.0], row_to_user)
            .optional()?
            .ok_or_else(|| Error::not_found(format!("user {id}")))
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let conn = self.conn.lock();
        let updated = conn
            .execute(
                UPDATE_USER,
                params![
                    user.first_name,
                    user.last_name,
                    normalize_email(&user.email),
                    user.access_level,
                    now_secs(),
                    user.id.0,
                ],
            )
            .map_err(|e| classify_write_error(e, "user email"))?;
        if updated == 0 {
            return Err(Error::not_found(format!("user {}", user.id)));
        }
        Ok(())
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<(UserId, String)> {
        let stored = {
            let conn = self.conn.lock();
            conn.query_row(SELECT_CREDENTIALS, [normalize_email(email)], |row| {
                Ok((UserId(row.get(0)?), row.get::<_, String>(1)?))
            })
            .optional()?
        };
        check_credentials(password, stored)
    }
}
