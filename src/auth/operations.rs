//! Authentication operations
//!
//! Runs a login submission end to end: validation, then session creation on
//! success.

use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::credentials::UserStore;
use super::results::{LoginOutcome, LoginResult};
use super::validator::validate;
use crate::error::GatewayError;
use crate::session::SessionStore;

/// Processes a login submission.
///
/// Validation (store lookup and Argon2 verification) runs on the blocking
/// pool. The session table is locked only after it has finished.
pub async fn process_login<S>(
    username: Option<String>,
    password: Option<String>,
    users: Arc<S>,
    sessions: &Mutex<SessionStore>,
) -> Result<LoginResult, GatewayError>
where
    S: UserStore + ?Sized + 'static,
{
    let submitted = username.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        validate(username.as_deref(), password.as_deref(), users.as_ref())
    })
    .await
    .map_err(|e| GatewayError::TaskFailed(format!("login validation: {e}")))??;

    let session_token = match &outcome {
        LoginOutcome::Authenticated(principal) => {
            let session = sessions.lock().await.create(principal);
            info!("User {} logged in", principal.username);
            Some(session.token().to_string())
        }
        LoginOutcome::UnknownUser | LoginOutcome::InvalidPassword => {
            warn!(
                "Rejected login for {:?}: {}",
                submitted.unwrap_or_default(),
                outcome.code().unwrap_or_default()
            );
            None
        }
        LoginOutcome::MissingUsername | LoginOutcome::MissingPassword => None,
    };

    Ok(LoginResult {
        outcome,
        session_token,
    })
}
