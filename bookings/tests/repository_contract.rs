//! Behavioural tests run against both repository backends.
//!
//! Every check is written once against `&dyn Repository` and executed for
//! the SQLite database and the in-memory repository, so the two backends
//! cannot drift apart.

mod common;

use bookings::{
    ErrorKind, MemoryRepository, NewRoomRestriction, NewUser, Repository, RestrictionKind,
    RoomId, StayRange,
};
use common::{create_test_database, reservation};

fn with_each_backend(check: impl Fn(&dyn Repository)) {
    let db = create_test_database();
    check(&db);

    let memory = MemoryRepository::new();
    check(&memory);
}

fn range(start: &str, end: &str) -> StayRange {
    StayRange::parse(start, end).unwrap()
}

#[test]
fn test_rooms_listed_in_id_order() {
    with_each_backend(|repo| {
        let a = repo.insert_room("General's Quarters").unwrap();
        let b = repo.insert_room("Major's Suite").unwrap();
        assert!(a < b);

        let rooms = repo.all_rooms().unwrap();
        let names: Vec<_> = rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["General's Quarters", "Major's Suite"]);
        assert_eq!(repo.get_room_by_id(b).unwrap().name, "Major's Suite");
    });
}

#[test]
fn test_unknown_room_is_not_found() {
    with_each_backend(|repo| {
        let err = repo.get_room_by_id(RoomId(99)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    });
}

#[test]
fn test_half_open_ranges_touching_do_not_overlap() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        repo.commit_booking(&reservation(room, "2030-01-01", "2030-01-03"))
            .unwrap();

        // Checkout day is free for the next guest
        assert!(repo
            .search_availability_by_dates_by_room_id(room, &range("2030-01-03", "2030-01-05"))
            .unwrap());
        assert!(repo
            .search_availability_by_dates_by_room_id(room, &range("2029-12-30", "2030-01-01"))
            .unwrap());

        assert!(!repo
            .search_availability_by_dates_by_room_id(room, &range("2030-01-02", "2030-01-04"))
            .unwrap());
        assert!(!repo
            .search_availability_by_dates_by_room_id(room, &range("2029-12-01", "2030-02-01"))
            .unwrap());
    });
}

#[test]
fn test_search_all_rooms_excludes_blocked_rooms() {
    with_each_backend(|repo| {
        let first = repo.insert_room("First").unwrap();
        let second = repo.insert_room("Second").unwrap();
        repo.insert_room_restriction(&NewRoomRestriction::owner_block(
            first,
            range("2030-06-01", "2030-06-10"),
        ))
        .unwrap();

        let free = repo
            .search_availability_for_all_rooms(&range("2030-06-05", "2030-06-06"))
            .unwrap();
        assert_eq!(free.iter().map(|r| r.id).collect::<Vec<_>>(), [second]);

        let free = repo
            .search_availability_for_all_rooms(&range("2030-06-10", "2030-06-11"))
            .unwrap();
        assert_eq!(free.len(), 2);
    });
}

#[test]
fn test_commit_booking_writes_reservation_and_restriction() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        let id = repo
            .commit_booking(&reservation(room, "2030-01-01", "2030-01-02"))
            .unwrap();

        let stored = repo.get_reservation_by_id(id).unwrap();
        assert_eq!(stored.room_id(), room);
        assert_eq!(stored.guest().email, "john@smith.com");
        assert!(!stored.processed());

        let restrictions = repo
            .get_restrictions_for_room_by_date(room, &range("2030-01-01", "2030-01-02"))
            .unwrap();
        assert_eq!(restrictions.len(), 1);
        assert_eq!(restrictions[0].kind, RestrictionKind::Reservation);
        assert_eq!(restrictions[0].reservation_id, Some(id));
    });
}

#[test]
fn test_second_overlapping_commit_conflicts() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        repo.commit_booking(&reservation(room, "2030-01-01", "2030-01-05"))
            .unwrap();

        let err = repo
            .commit_booking(&reservation(room, "2030-01-04", "2030-01-06"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(repo.all_reservations().unwrap().len(), 1);
    });
}

#[test]
fn test_commit_booking_for_missing_room() {
    with_each_backend(|repo| {
        let err = repo
            .commit_booking(&reservation(RoomId(42), "2030-01-01", "2030-01-02"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(repo.all_reservations().unwrap().is_empty());
    });
}

#[test]
fn test_owner_block_lifecycle() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        let stay = range("2030-03-01", "2030-03-04");
        let block = repo
            .insert_room_restriction(&NewRoomRestriction::owner_block(room, stay))
            .unwrap();

        assert!(!repo.search_availability_by_dates_by_room_id(room, &stay).unwrap());
        let err = repo
            .commit_booking(&reservation(room, "2030-03-02", "2030-03-03"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        repo.delete_block(block).unwrap();
        assert!(repo.search_availability_by_dates_by_room_id(room, &stay).unwrap());
        assert_eq!(repo.delete_block(block).unwrap_err().kind(), ErrorKind::NotFound);
    });
}

#[test]
fn test_reservation_restrictions_cannot_be_deleted_as_blocks() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        repo.commit_booking(&reservation(room, "2030-01-01", "2030-01-02"))
            .unwrap();
        let restriction = repo
            .get_restrictions_for_room_by_date(room, &range("2030-01-01", "2030-01-02"))
            .unwrap()
            .remove(0);

        let err = repo.delete_block(restriction.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    });
}

#[test]
fn test_delete_reservation_frees_dates() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        let stay = range("2030-01-01", "2030-01-03");
        let id = repo
            .commit_booking(&reservation(room, "2030-01-01", "2030-01-03"))
            .unwrap();

        repo.delete_reservation(id).unwrap();
        assert!(repo.search_availability_by_dates_by_room_id(room, &stay).unwrap());
        assert_eq!(
            repo.get_reservation_by_id(id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            repo.delete_reservation(id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    });
}

#[test]
fn test_new_reservations_exclude_processed() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        let late = repo
            .commit_booking(&reservation(room, "2030-02-01", "2030-02-02"))
            .unwrap();
        let early = repo
            .commit_booking(&reservation(room, "2030-01-01", "2030-01-02"))
            .unwrap();

        let all: Vec<_> = repo.all_reservations().unwrap().iter().map(|r| r.id()).collect();
        assert_eq!(all, [early, late]);

        repo.update_processed_for_reservation(early, true).unwrap();
        let new: Vec<_> = repo
            .all_new_reservations()
            .unwrap()
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(new, [late]);
        assert!(repo.get_reservation_by_id(early).unwrap().processed());
    });
}

#[test]
fn test_update_reservation_contact_details() {
    with_each_backend(|repo| {
        let room = repo.insert_room("Room").unwrap();
        let id = repo
            .commit_booking(&reservation(room, "2030-01-01", "2030-01-02"))
            .unwrap();

        let mut stored = repo.get_reservation_by_id(id).unwrap();
        stored.guest_mut().phone = "987654321".to_string();
        repo.update_reservation(&stored).unwrap();

        assert_eq!(repo.get_reservation_by_id(id).unwrap().guest().phone, "987654321");
    });
}

#[test]
fn test_users_authenticate_by_email() {
    with_each_backend(|repo| {
        let id = repo
            .insert_user(&NewUser::with_password(
                "Admin",
                "User",
                "Admin@Example.com",
                "secret",
                3,
            ))
            .unwrap();

        let (user_id, hash) = repo.authenticate("admin@example.com", "secret").unwrap();
        assert_eq!(user_id, id);
        assert!(hash.starts_with("sha256$"));

        assert_eq!(
            repo.authenticate("admin@example.com", "wrong").unwrap_err().kind(),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            repo.authenticate("nobody@example.com", "secret").unwrap_err().kind(),
            ErrorKind::InvalidCredentials
        );

        let duplicate = repo
            .insert_user(&NewUser::with_password("A", "B", "admin@example.com", "x", 1))
            .unwrap_err();
        assert_eq!(duplicate.kind(), ErrorKind::Conflict);
    });
}
