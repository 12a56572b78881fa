//! Password hashing.
//!
//! Argon2id with a random salt per password, stored as a PHC string.

use crate::error::{BookingError, Result};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Hash a plain-text password.
///
/// # Errors
///
/// Returns [`BookingError::Credential`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BookingError::Credential(e.to_string()))
}

/// Check a plain-text password against a stored PHC string.
///
/// # Errors
///
/// Returns [`BookingError::Credential`] if the stored hash is malformed.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| BookingError::Credential(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(BookingError::Credential(e.to_string())),
    }
}
