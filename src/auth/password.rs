//! Password verifiers
//!
//! Principals store Argon2 PHC strings, never plaintext.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::Argon2;
use log::warn;

use crate::error::AuthError;

/// Hashes `password` into a PHC string suitable for a `[[users]]` entry.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashingFailed(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Checks `password` against a stored PHC string.
///
/// An unparseable verifier never matches.
pub fn verify_password(phc: &str, password: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password verifier is not a valid PHC string: {}", e);
            false
        }
    }
}
