//! Credential storage and management
//!
//! Defines the principal record and the user store the validator consults.

use std::collections::HashMap;

use crate::config::UserEntry;
use crate::error::StoreError;

/// A registered identity and its password verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Lookup-by-username capability of the user store.
///
/// The core only reads principals through this trait. A lookup that cannot
/// be answered is a `StoreError`, distinct from "no such user".
pub trait UserStore: Send + Sync {
    fn find_principal_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError>;
}

/// User store backed by the `[[users]]` configuration table.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    principals: HashMap<String, Principal>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[UserEntry]) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.insert(Principal {
                username: entry.username.clone(),
                password_hash: entry.password_hash.clone(),
            });
        }
        store
    }

    pub fn insert(&mut self, principal: Principal) {
        self.principals.insert(principal.username.clone(), principal);
    }
}

impl UserStore for InMemoryUserStore {
    fn find_principal_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        Ok(self.principals.get(username).cloned())
    }
}
