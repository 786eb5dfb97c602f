//! Database schema management and migrations.
//!
//! This module handles database schema initialization and version checking.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_METADATA_TABLE, CREATE_NO_OVERLAP_TRIGGER, CREATE_RESERVATIONS_TABLE,
    CREATE_RESERVATION_START_INDEX, CREATE_RESTRICTIONS_TABLE, CREATE_RESTRICTION_DATES_INDEX,
    CREATE_RESTRICTION_RESERVATION_INDEX, CREATE_ROOMS_TABLE, CREATE_ROOM_RESTRICTIONS_TABLE,
    CREATE_USERS_TABLE, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, SEED_RESTRICTIONS,
    SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// Creates all tables, indices, the overlap trigger, the restriction kind
/// lookup rows, and the schema version, in a single batch.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use bookings::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    conn.execute(CREATE_ROOMS_TABLE, [])?;
    conn.execute(CREATE_RESTRICTIONS_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;
    conn.execute(CREATE_ROOM_RESTRICTIONS_TABLE, [])?;
    conn.execute(CREATE_USERS_TABLE, [])?;

    conn.execute(CREATE_RESTRICTION_DATES_INDEX, [])?;
    conn.execute(CREATE_RESTRICTION_RESERVATION_INDEX, [])?;
    conn.execute(CREATE_RESERVATION_START_INDEX, [])?;
    conn.execute_batch(CREATE_NO_OVERLAP_TRIGGER)?;

    conn.execute(SEED_RESTRICTIONS, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    log::debug!("initialized database schema version {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than
/// "no rows returned" (which indicates version 0).
///
/// # Returns
///
/// - `Ok(0)` if the metadata table doesn't exist or has no version
/// - `Ok(version)` if a version is found
/// - `Err(_)` if a database error occurs
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            // "no such table" surfaces as a generic SQLITE_ERROR
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// A fresh database (version 0) is initialized; a matching version is
/// accepted; anything else is refused.
///
/// # Errors
///
/// Returns an error if the schema version is incompatible, or if
/// initialization or the version query fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version < CURRENT_SCHEMA_VERSION {
        return Err(Error::storage(format!(
            "database schema version {version} is older than client version {CURRENT_SCHEMA_VERSION}"
        )));
    } else if version > CURRENT_SCHEMA_VERSION {
        return Err(Error::storage(format!(
            "database schema version {version} is newer than client version {CURRENT_SCHEMA_VERSION}; upgrade bookings"
        )));
    }

    Ok(())
}
