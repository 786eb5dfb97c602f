//! Database schema definitions and SQL constants.
//!
//! Dates are stored as `YYYY-MM-DD` text, which orders correctly under
//! string comparison; timestamps are Unix epoch seconds.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Message raised by the overlap trigger; matched when mapping errors.
pub const OVERLAP_MESSAGE: &str = "overlapping room restriction";

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the rooms table.
pub const CREATE_ROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_name TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the restriction kind lookup table.
pub const CREATE_RESTRICTIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS restrictions (
        id INTEGER PRIMARY KEY,
        restriction_name TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the reservations table.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        processed INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (start_date < end_date)
    )";

/// SQL statement to create the room restrictions table.
///
/// `reservation_id` is NULL for owner blocks.
pub const CREATE_ROOM_RESTRICTIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS room_restrictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        reservation_id INTEGER REFERENCES reservations(id) ON DELETE CASCADE,
        restriction_id INTEGER NOT NULL REFERENCES restrictions(id),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (start_date < end_date)
    )";

/// SQL statement to create the users table.
pub const CREATE_USERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        access_level INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// Index backing the overlap queries.
pub const CREATE_RESTRICTION_DATES_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_room_restrictions_room_dates
    ON room_restrictions(room_id, start_date, end_date)";

/// Index used when deleting a reservation's restriction.
pub const CREATE_RESTRICTION_RESERVATION_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_room_restrictions_reservation
    ON room_restrictions(reservation_id)";

/// Index used by the ordered reservation listings.
pub const CREATE_RESERVATION_START_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_start ON reservations(start_date)";

/// Refuses any restriction that overlaps another on the same room.
///
/// This closes the window between an availability check and the insert
/// for writers that bypass the transactional re-check.
pub const CREATE_NO_OVERLAP_TRIGGER: &str = r"
    CREATE TRIGGER IF NOT EXISTS room_restrictions_no_overlap
    BEFORE INSERT ON room_restrictions
    WHEN EXISTS (
        SELECT 1 FROM room_restrictions
        WHERE room_id = NEW.room_id
          AND start_date < NEW.end_date
          AND end_date > NEW.start_date
    )
    BEGIN
        SELECT RAISE(ABORT, 'overlapping room restriction');
    END";

/// Seeds the restriction kind lookup rows.
pub const SEED_RESTRICTIONS: &str = r"
    INSERT OR IGNORE INTO restrictions (id, restriction_name, created_at, updated_at)
    VALUES (1, 'Reservation', 0, 0), (2, 'Owner Block', 0, 0)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to insert a reservation row.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (first_name, last_name, email, phone, start_date, end_date, room_id,
     processed, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
";

/// SQL statement to insert a restriction row.
pub const INSERT_ROOM_RESTRICTION: &str = r"
    INSERT INTO room_restrictions
    (start_date, end_date, room_id, reservation_id, restriction_id, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

/// SQL statement counting restrictions on a room that overlap `[start, end)`.
///
/// Parameters: `room_id`, `end`, `start`.
pub const COUNT_OVERLAPPING: &str = r"
    SELECT COUNT(id) FROM room_restrictions
    WHERE room_id = ? AND start_date < ? AND end_date > ?
";

/// SQL statement to insert a room.
pub const INSERT_ROOM: &str =
    "INSERT INTO rooms (room_name, created_at, updated_at) VALUES (?, ?, ?)";

/// SQL statement checking that a room exists.
pub const ROOM_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM rooms WHERE id = ?)";
