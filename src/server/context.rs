//! Shared gateway state
//!
//! Everything a connection handler needs, shared behind an `Arc`.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::{InMemoryUserStore, UserStore};
use crate::config::GatewayConfig;
use crate::session::{SessionGuard, SessionStore};

pub struct GatewayContext {
    pub users: Arc<dyn UserStore>,
    pub sessions: Mutex<SessionStore>,
    pub guard: SessionGuard,
    pub max_line_length: usize,
}

impl GatewayContext {
    pub fn new(users: Arc<dyn UserStore>, config: &GatewayConfig) -> Self {
        Self {
            users,
            sessions: Mutex::new(SessionStore::new(config.sessions.max_sessions)),
            guard: SessionGuard::from_config(&config.server),
            max_line_length: config.server.max_line_length,
        }
    }

    /// Builds a context whose user store is the configured `[[users]]` table.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let users = InMemoryUserStore::from_entries(&config.users);
        Self::new(Arc::new(users), config)
    }
}
