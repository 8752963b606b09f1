//! Authentication validator
//!
//! Decides the outcome of a login submission. Checks run in a fixed order:
//! username presence, password presence, store lookup, password verification.
//! The first failing check decides the outcome.

use super::credentials::UserStore;
use super::password::verify_password;
use super::results::LoginOutcome;
use crate::error::StoreError;

/// A submitted field counts as missing when absent or blank.
fn present(input: Option<&str>) -> Option<&str> {
    input.filter(|value| !value.trim().is_empty())
}

/// Validates a login submission against the user store.
///
/// Input problems and unknown users are returned as outcomes; only a store
/// failure is an `Err`.
pub fn validate<S>(
    username: Option<&str>,
    password: Option<&str>,
    store: &S,
) -> Result<LoginOutcome, StoreError>
where
    S: UserStore + ?Sized,
{
    let Some(username) = present(username) else {
        return Ok(LoginOutcome::MissingUsername);
    };
    let Some(password) = present(password) else {
        return Ok(LoginOutcome::MissingPassword);
    };

    let Some(principal) = store.find_principal_by_username(username)? else {
        return Ok(LoginOutcome::UnknownUser);
    };

    if verify_password(&principal.password_hash, password) {
        Ok(LoginOutcome::Authenticated(principal))
    } else {
        Ok(LoginOutcome::InvalidPassword)
    }
}
