//! Transaction management utilities.
//!
//! Multi-row writes run in `IMMEDIATE` transactions so the write lock is
//! taken before the availability re-check, not at the first insert.

use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::{Error, Result};
use crate::reservation::{NewReservation, ReservationId};
use crate::room::{NewRoomRestriction, RoomId};

use super::connection::Database;
use super::operations::{
    count_overlapping, ensure_room_exists, insert_reservation_row, insert_restriction_row,
    insert_room_row, now_secs,
};

const DELETE_RESERVATION_RESTRICTIONS: &str =
    "DELETE FROM room_restrictions WHERE reservation_id = ?";

const DELETE_RESERVATION: &str = "DELETE FROM reservations WHERE id = ?";

/// Re-checks availability, then inserts a reservation and its restriction.
///
/// The transaction rolls back on any failure, so a reservation row never
/// persists without the restriction that blocks its nights.
pub(super) fn commit_booking(
    conn: &mut Connection,
    reservation: &NewReservation,
) -> Result<ReservationId> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let room_id = reservation.room_id();
    let range = reservation.range();

    ensure_room_exists(&tx, room_id)?;
    if count_overlapping(&tx, room_id, &range)? > 0 {
        return Err(Error::Conflict {
            details: format!("room {room_id} is no longer available for {range}"),
        });
    }

    let now = now_secs();
    let id = insert_reservation_row(&tx, reservation, now)?;
    insert_restriction_row(
        &tx,
        &NewRoomRestriction::for_reservation(room_id, id, range),
        now,
    )?;

    tx.commit()?;
    log::info!("booked room {room_id} for {range} as reservation {id}");
    Ok(id)
}

/// Deletes a reservation and every restriction it owns.
pub(super) fn delete_reservation(conn: &mut Connection, id: ReservationId) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(DELETE_RESERVATION_RESTRICTIONS, params![id.value()])?;
    let deleted = tx.execute(DELETE_RESERVATION, params![id.value()])?;
    if deleted == 0 {
        return Err(Error::not_found(format!("reservation {id}")));
    }

    tx.commit()?;
    log::info!("deleted reservation {id}");
    Ok(())
}

impl Database {
    /// Adds several rooms in a single transaction.
    ///
    /// This operation is atomic: either every room is created or none are.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or committed,
    /// or if any insert fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bookings::database::{Database, DatabaseConfig};
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/bookings.db")).unwrap();
    /// let ids = db.insert_rooms(&["General's Quarters", "Major's Suite"]).unwrap();
    /// assert_eq!(ids.len(), 2);
    /// ```
    pub fn insert_rooms(&self, names: &[&str]) -> Result<Vec<RoomId>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let now = now_secs();
        let ids = names
            .iter()
            .map(|name| insert_room_row(&tx, name, now))
            .collect::<Result<Vec<_>>>()?;

        tx.commit()?;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, create_test_reservation};
    use crate::{ErrorKind, Repository, StayRange};

    fn force_restriction_failure(db: &Database) {
        db.connection()
            .execute_batch(
                r"
                CREATE TEMP TRIGGER fail_restrictions
                BEFORE INSERT ON room_restrictions
                BEGIN
                    SELECT RAISE(ABORT, 'forced failure');
                END;
                ",
            )
            .unwrap();
    }

    #[test]
    fn test_insert_rooms_batch() {
        let db = create_test_database();
        let ids = db.insert_rooms(&["One", "Two", "Three"]).unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(db.all_rooms().unwrap().len(), 3);
    }

    #[test]
    fn test_commit_booking_conflict_leaves_no_rows() {
        let db = create_test_database();
        let room = db.insert_room("Room").unwrap();
        db.commit_booking(&create_test_reservation(room, "2030-01-01", "2030-01-05"))
            .unwrap();

        let err = db
            .commit_booking(&create_test_reservation(room, "2030-01-04", "2030-01-06"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(db.all_reservations().unwrap().len(), 1);
    }

    #[test]
    fn test_commit_booking_missing_room() {
        let db = create_test_database();
        let err = db
            .commit_booking(&create_test_reservation(RoomId(5), "2030-01-01", "2030-01-02"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_restriction_failure_rolls_back_reservation() {
        let db = create_test_database();
        let room = db.insert_room("Room").unwrap();
        force_restriction_failure(&db);

        let err = db
            .commit_booking(&create_test_reservation(room, "2030-01-01", "2030-01-02"))
            .unwrap_err();
        assert!(err.is_storage_failure());
        assert!(db.all_reservations().unwrap().is_empty());
    }

    #[test]
    fn test_delete_reservation_frees_the_range() {
        let db = create_test_database();
        let room = db.insert_room("Room").unwrap();
        let id = db
            .commit_booking(&create_test_reservation(room, "2030-01-01", "2030-01-03"))
            .unwrap();

        db.delete_reservation(id).unwrap();

        let stay = StayRange::parse("2030-01-01", "2030-01-03").unwrap();
        assert!(db.search_availability_by_dates_by_room_id(room, &stay).unwrap());
        assert!(db.delete_reservation(id).unwrap_err().is_not_found());
    }
}
