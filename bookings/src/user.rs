//! Users and password hashing.
//!
//! Users only matter to the engine as an authentication lookup key.
//! Passwords are stored as `sha256$<salt>$<hex digest>`.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

const HASH_SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

// Verified against when an email is unknown, so both rejections cost one digest.
const DUMMY_HASH: &str =
    "sha256$0000000000000000$0000000000000000000000000000000000000000000000000000000000000000";

/// Identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identity.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email, unique.
    pub email: String,
    /// Salted password hash.
    pub password_hash: String,
    /// Access level; 1 for regular users, 3 for administrators.
    pub access_level: i64,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last changed.
    pub updated_at: DateTime<Utc>,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Salted password hash, see [`hash_password`].
    pub password_hash: String,
    /// Access level.
    pub access_level: i64,
}

impl NewUser {
    /// Creates a user, hashing `password` with a fresh salt.
    #[must_use]
    pub fn with_password(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
        access_level: i64,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: normalize_email(&email.into()),
            password_hash: hash_password(password),
            access_level,
        }
    }
}

/// Hashes a password with a random salt.
///
/// # Examples
///
/// ```
/// use bookings::user::{hash_password, verify_password};
///
/// let hash = hash_password("hunter2");
/// assert!(verify_password("hunter2", &hash).unwrap());
/// assert!(!verify_password("hunter3", &hash).unwrap());
/// ```
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect();
    format!("{HASH_SCHEME}${salt}${}", digest(&salt, password))
}

/// Checks `password` against a stored hash.
///
/// # Errors
///
/// Returns a storage failure when the stored hash is not in the expected
/// format.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(HASH_SCHEME), Some(salt), Some(expected)) => Ok(constant_time_eq(
            digest(salt, password).as_bytes(),
            expected.as_bytes(),
        )),
        _ => Err(Error::storage("stored password hash has an unknown format")),
    }
}

/// Canonical form of an email used for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Resolves a credential lookup: `stored` is the id and hash found for the
/// email, if any.
///
/// Unknown emails, wrong passwords, and unreadable hashes all come back as
/// `InvalidCredentials`.
pub(crate) fn check_credentials(
    password: &str,
    stored: Option<(UserId, String)>,
) -> Result<(UserId, String)> {
    let Some((id, hash)) = stored else {
        let _ = std::hint::black_box(verify_password(password, DUMMY_HASH));
        return Err(Error::InvalidCredentials);
    };
    match verify_password(password, &hash) {
        Ok(true) => Ok((id, hash)),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(e) => {
            log::warn!("user {id}: {e}");
            Err(Error::InvalidCredentials)
        }
    }
}

// Examines every byte regardless of where the first mismatch is.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
