//! Authentication result types
//!
//! Defines the outcome of a login attempt and its stable wire codes.

use super::credentials::Principal;
use crate::messages;

/// Tagged result of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    MissingUsername,
    MissingPassword,
    UnknownUser,
    InvalidPassword,
    Authenticated(Principal),
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }

    /// User-facing message for a rejected submission.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LoginOutcome::MissingUsername => Some(messages::USERNAME_MISSING),
            LoginOutcome::MissingPassword => Some(messages::PASSWORD_MISSING),
            LoginOutcome::UnknownUser => Some(messages::USERNAME_NOT_FOUND),
            LoginOutcome::InvalidPassword => Some(messages::PASSWORD_INCORRECT),
            LoginOutcome::Authenticated(_) => None,
        }
    }

    /// Stable machine code, as carried in `?error=` redirects.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            LoginOutcome::MissingUsername => Some("username_missing"),
            LoginOutcome::MissingPassword => Some("password_missing"),
            LoginOutcome::UnknownUser => Some("username_not_found"),
            LoginOutcome::InvalidPassword => Some("password_incorrect"),
            LoginOutcome::Authenticated(_) => None,
        }
    }

    /// Form field the rejection refers to.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            LoginOutcome::MissingUsername | LoginOutcome::UnknownUser => Some("username"),
            LoginOutcome::MissingPassword | LoginOutcome::InvalidPassword => Some("password"),
            LoginOutcome::Authenticated(_) => None,
        }
    }

    /// Inverse of [`LoginOutcome::code`]; unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<LoginOutcome> {
        match code {
            "username_missing" => Some(LoginOutcome::MissingUsername),
            "password_missing" => Some(LoginOutcome::MissingPassword),
            "username_not_found" => Some(LoginOutcome::UnknownUser),
            "password_incorrect" => Some(LoginOutcome::InvalidPassword),
            _ => None,
        }
    }

    /// Builds the login redirect target carrying this rejection, e.g.
    /// `/login?error=username_missing`.
    pub fn redirect_target(&self, login_path: &str) -> Option<String> {
        self.code().map(|code| format!("{login_path}?error={code}"))
    }

    /// Parses the rejections out of a redirect query string, ignoring
    /// anything that is not a known `error=` code.
    pub fn from_query(query: &str) -> Vec<LoginOutcome> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.strip_prefix("error="))
            .filter_map(LoginOutcome::from_code)
            .collect()
    }
}

/// Result of a processed login submission.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub outcome: LoginOutcome,
    /// Token of the session created on success
    pub session_token: Option<String>,
}
