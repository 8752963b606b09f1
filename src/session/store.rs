//! Session table
//!
//! Holds the sessions created by successful logins. The table is bounded;
//! when full, the oldest session is evicted to make room.

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use std::collections::{HashMap, VecDeque};

use crate::auth::Principal;

const TOKEN_LENGTH: usize = 50;

/// Narrow capability the access guard depends on.
pub trait SessionValidator {
    fn is_valid(&self, token: &str) -> bool;
}

/// A session bound to exactly one principal.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    username: String,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Bounded in-memory session table keyed by token.
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    order: VecDeque<String>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Creates a session for `principal` and returns it.
    pub fn create(&mut self, principal: &Principal) -> Session {
        while self.sessions.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.sessions.remove(&oldest);
                }
                None => break,
            }
        }

        let token = generate_token();
        let session = Session {
            token: token.clone(),
            username: principal.username.clone(),
        };
        self.order.push_back(token.clone());
        self.sessions.insert(token, session.clone());
        session
    }

    pub fn get(&self, token: &str) -> Option<&Session> {
        self.sessions.get(token)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionValidator for SessionStore {
    fn is_valid(&self, token: &str) -> bool {
        self.sessions.contains_key(token)
    }
}

fn generate_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
