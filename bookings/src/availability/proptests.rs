//! Property-based tests for availability queries.

use super::AvailabilityEngine;
use crate::database::test_util::create_test_database;
use crate::{Guest, MemoryRepository, NewReservation, Repository, RoomId, StayRange};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
}

fn make_range(offset: u64, nights: u64) -> StayRange {
    let start = base() + Days::new(offset);
    StayRange::new(start, start + Days::new(nights)).unwrap()
}

// (offset from base, nights)
fn range_strategy() -> impl Strategy<Value = (u64, u64)> {
    (0u64..60, 1u64..10)
}

fn book<R: Repository>(repo: &R, room: RoomId, range: StayRange) -> bool {
    let reservation = NewReservation::builder(room, range)
        .guest(Guest::new("Ada", "Lovelace", "ada@example.com", ""))
        .build()
        .unwrap();
    repo.commit_booking(&reservation).is_ok()
}

proptest! {
    #[test]
    fn overlapping_request_is_unavailable(
        (booked_offset, booked_nights) in range_strategy(),
        (query_offset, query_nights) in range_strategy(),
    ) {
        let repo = MemoryRepository::new();
        let room = repo.insert_room("Room").unwrap();
        let booked = make_range(booked_offset, booked_nights);
        let query = make_range(query_offset, query_nights);
        prop_assert!(book(&repo, room, booked));

        let engine = AvailabilityEngine::new(&repo);
        let available = engine
            .is_room_available(room, query.start(), query.end())
            .unwrap();
        prop_assert_eq!(available, !booked.overlaps(&query));
    }

    #[test]
    fn search_agrees_with_single_room_checks(
        bookings in prop::collection::vec((0usize..4, range_strategy()), 0..12),
        (query_offset, query_nights) in range_strategy(),
    ) {
        let repo = MemoryRepository::new();
        let rooms: Vec<RoomId> = (0..4)
            .map(|i| repo.insert_room(&format!("Room {i}")).unwrap())
            .collect();
        for (room, (offset, nights)) in bookings {
            // Conflicting bookings are refused; that is fine here
            book(&repo, rooms[room], make_range(offset, nights));
        }

        let query = make_range(query_offset, query_nights);
        let engine = AvailabilityEngine::new(&repo);
        let found: Vec<RoomId> = engine
            .search_all_rooms(query.start(), query.end())
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        let expected: Vec<RoomId> = rooms
            .iter()
            .copied()
            .filter(|room| engine.is_room_available(*room, query.start(), query.end()).unwrap())
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn committed_bookings_never_overlap(
        requests in prop::collection::vec(range_strategy(), 1..15),
    ) {
        let repo = MemoryRepository::new();
        let room = repo.insert_room("Room").unwrap();
        for (offset, nights) in requests {
            book(&repo, room, make_range(offset, nights));
        }

        let committed: Vec<StayRange> = repo
            .all_reservations()
            .unwrap()
            .iter()
            .map(|r| r.range())
            .collect();
        for (i, a) in committed.iter().enumerate() {
            for b in &committed[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn backends_agree_on_availability(
        bookings in prop::collection::vec(range_strategy(), 0..6),
        (query_offset, query_nights) in range_strategy(),
    ) {
        let memory = MemoryRepository::new();
        let sqlite = create_test_database();
        let mem_room = memory.insert_room("Room").unwrap();
        let db_room = sqlite.insert_room("Room").unwrap();

        for (offset, nights) in bookings {
            let range = make_range(offset, nights);
            prop_assert_eq!(book(&memory, mem_room, range), book(&sqlite, db_room, range));
        }

        let query = make_range(query_offset, query_nights);
        prop_assert_eq!(
            AvailabilityEngine::new(&memory).is_room_available(mem_room, query.start(), query.end()).unwrap(),
            AvailabilityEngine::new(&sqlite).is_room_available(db_room, query.start(), query.end()).unwrap()
        );
    }
}
