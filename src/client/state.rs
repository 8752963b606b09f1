//! Module `state`
//!
//! Defines the `Client` struct that tracks one connection's authentication
//! state.

/// Authentication state of a client.
///
/// Every client starts `Unauthenticated`. The only transition is to
/// `Authenticated`, taken when a login succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated { username: String, token: String },
}

/// Represents the state of a connected gateway client.
#[derive(Debug, Default)]
pub struct Client {
    peer: String,
    auth: AuthState,
}

impl Client {
    pub fn new(peer: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            auth: AuthState::Unauthenticated,
        }
    }

    /// Records a successful login. A later login replaces the session.
    pub fn authenticate(&mut self, username: String, token: String) {
        self.auth = AuthState::Authenticated { username, token };
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.auth, AuthState::Authenticated { .. })
    }

    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    /// Returns the username of the client if logged in.
    pub fn username(&self) -> Option<&str> {
        match &self.auth {
            AuthState::Authenticated { username, .. } => Some(username),
            AuthState::Unauthenticated => None,
        }
    }

    /// Returns the session token held by this client, if any.
    pub fn session_token(&self) -> Option<&str> {
        match &self.auth {
            AuthState::Authenticated { token, .. } => Some(token),
            AuthState::Unauthenticated => None,
        }
    }

    /// Returns the peer address this client connected from.
    pub fn peer(&self) -> &str {
        &self.peer
    }
}
