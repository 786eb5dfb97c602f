//! The search, stage, and confirm flow.
//!
//! The caller owns a [`BookingSession`] (typically stored in its session
//! store between requests). Staging writes a [`BookingDraft`] into it;
//! confirming validates the guest's contact details, re-checks availability,
//! and commits the reservation together with its restriction.
//!
//! # Examples
//!
//! ```
//! use bookings::{
//!     BookingOrchestrator, BookingRules, BookingSession, ConfirmOutcome, FormData,
//!     MemoryRepository, Repository,
//! };
//!
//! let repo = MemoryRepository::new();
//! repo.insert_room("General's Quarters").unwrap();
//!
//! let orchestrator = BookingOrchestrator::new(&repo, BookingRules::default());
//! let mut session = BookingSession::default();
//!
//! let data: FormData = [
//!     ("start_date", "2030-01-01"),
//!     ("end_date", "2030-01-02"),
//!     ("room_id", "1"),
//!     ("first_name", "John"),
//!     ("last_name", "Smith"),
//!     ("email", "john@smith.com"),
//!     ("phone", "123456789"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let outcome = orchestrator.book_from_form(&mut session, &data).unwrap();
//! assert!(matches!(outcome, ConfirmOutcome::Confirmed(_)));
//! assert!(session.draft().is_none());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityEngine;
use crate::config::DEFAULT_FIRST_NAME_MIN_LENGTH;
use crate::error::{Error, Result};
use crate::forms::{Form, FormData, FormErrors};
use crate::repository::Repository;
use crate::reservation::{Guest, NewReservation, ReservationId};
use crate::room::{Room, RoomId};
use crate::stay::StayRange;

/// Business rules applied when confirming a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRules {
    /// Minimum number of characters in the guest's first name.
    pub first_name_min_length: usize,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            first_name_min_length: DEFAULT_FIRST_NAME_MIN_LENGTH,
        }
    }
}

/// A chosen room and range awaiting contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// The chosen room.
    pub room: Room,
    /// The requested nights.
    pub range: StayRange,
}

/// Caller-held staging area between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSession {
    draft: Option<BookingDraft>,
}

impl BookingSession {
    /// The staged draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&BookingDraft> {
        self.draft.as_ref()
    }

    /// Discards any staged draft.
    pub fn clear(&mut self) {
        self.draft = None;
    }
}

/// A committed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Id of the stored reservation.
    pub reservation_id: ReservationId,
    /// The booked room.
    pub room: Room,
    /// Guest contact details as stored.
    pub guest: Guest,
    /// The booked nights.
    pub range: StayRange,
}

/// Result of a confirm attempt that reached validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The reservation and its restriction were stored.
    Confirmed(Confirmation),
    /// Contact details failed validation; the draft is still staged.
    Invalid {
        /// Every violation found.
        errors: FormErrors,
        /// The draft left in the session.
        draft: BookingDraft,
    },
}

/// Drives a booking from search to confirmation.
#[derive(Debug)]
pub struct BookingOrchestrator<'a, R: Repository + ?Sized> {
    repo: &'a R,
    rules: BookingRules,
}

impl<'a, R: Repository + ?Sized> BookingOrchestrator<'a, R> {
    /// Creates an orchestrator over `repo`.
    #[must_use]
    pub const fn new(repo: &'a R, rules: BookingRules) -> Self {
        Self { repo, rules }
    }

    /// Rooms that can be booked for `[start, end)`.
    ///
    /// With `room`, the result is that room alone if it is free and empty
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` unless `start < end`, `NotFound` for an
    /// unknown `room`, and propagates storage failures.
    pub fn search(&self, start: NaiveDate, end: NaiveDate, room: Option<RoomId>) -> Result<Vec<Room>> {
        let engine = AvailabilityEngine::new(self.repo);
        match room {
            None => engine.search_all_rooms(start, end),
            Some(room_id) => {
                if engine.is_room_available(room_id, start, end)? {
                    Ok(vec![self.repo.get_room_by_id(room_id)?])
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }

    /// Stores a draft for `room_id` over `[start, end)` in the session.
    ///
    /// Nothing is persisted. A previously staged draft is replaced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` unless `start < end` and `NotFound` for an
    /// unknown room.
    pub fn stage(
        &self,
        session: &mut BookingSession,
        room_id: RoomId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BookingDraft> {
        let range = StayRange::new(start, end)?;
        let room = self.repo.get_room_by_id(room_id)?;
        let draft = BookingDraft { room, range };
        session.draft = Some(draft.clone());
        log::debug!("staged room {room_id} for {range}");
        Ok(draft)
    }

    /// Validates contact details and commits the staged draft.
    ///
    /// Validation failures are returned as [`ConfirmOutcome::Invalid`] and
    /// leave the draft staged. On success the session is cleared.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when nothing is staged, `Conflict` when the
    /// range was taken since staging, and propagates storage failures. The
    /// draft stays staged on every error.
    pub fn confirm(&self, session: &mut BookingSession, data: &FormData) -> Result<ConfirmOutcome> {
        let draft = session
            .draft
            .clone()
            .ok_or_else(|| Error::invalid_input("session", "no booking has been staged"))?;

        let mut form = Form::new(data.clone());
        form.required(&["first_name", "last_name", "email"]);
        form.min_length("first_name", self.rules.first_name_min_length);
        form.is_email("email");

        if !form.valid() {
            log::debug!(
                "contact details rejected for room {}: {} field(s)",
                draft.room.id,
                form.errors().len()
            );
            return Ok(ConfirmOutcome::Invalid {
                errors: form.into_errors(),
                draft,
            });
        }

        let guest = Guest::new(
            form.get("first_name"),
            form.get("last_name"),
            form.get("email"),
            form.get("phone"),
        );
        let reservation = NewReservation::builder(draft.room.id, draft.range)
            .guest(guest)
            .build()?;

        let engine = AvailabilityEngine::new(self.repo);
        if !engine.is_room_available(draft.room.id, draft.range.start(), draft.range.end())? {
            return Err(Error::Conflict {
                details: format!(
                    "room {} is no longer available for {}",
                    draft.room.id, draft.range
                ),
            });
        }

        let reservation_id = self.repo.commit_booking(&reservation)?;
        session.clear();
        log::info!(
            "confirmed reservation {reservation_id} for {} in room {}",
            reservation.guest().full_name(),
            draft.room.id
        );

        Ok(ConfirmOutcome::Confirmed(Confirmation {
            reservation_id,
            room: draft.room,
            guest: reservation.guest().clone(),
            range: draft.range,
        }))
    }

    /// One-shot booking from a form post carrying `start_date`, `end_date`,
    /// `room_id`, and the contact fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unparsable date or room id before any
    /// repository call, then anything [`stage`](Self::stage) or
    /// [`confirm`](Self::confirm) returns.
    pub fn book_from_form(&self, session: &mut BookingSession, data: &FormData) -> Result<ConfirmOutcome> {
        let field = |name: &str| data.get(name).unwrap_or_default();
        let range = StayRange::parse(field("start_date"), field("end_date"))?;
        let room_id: RoomId = field("room_id").parse()?;

        self.stage(session, room_id, range.start(), range.end())?;
        self.confirm(session, data)
    }
}
