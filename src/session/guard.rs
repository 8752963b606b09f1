//! Access guard
//!
//! Admits or redirects requests for protected resources. The guard only asks
//! whether a session token is valid; it knows nothing about credentials.

use log::info;

use super::store::SessionValidator;
use crate::config::ServerConfig;
use crate::messages;

/// A request as seen by the guard.
#[derive(Debug, Clone)]
pub struct AccessRequest<'a> {
    pub path: &'a str,
    pub session_token: Option<&'a str>,
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Admit,
    Deny {
        redirect_to: String,
        message: &'static str,
    },
}

pub struct SessionGuard {
    login_path: String,
    protected_paths: Vec<String>,
}

impl SessionGuard {
    pub fn new(login_path: impl Into<String>, protected_paths: Vec<String>) -> Self {
        Self {
            login_path: login_path.into(),
            protected_paths: protected_paths
                .into_iter()
                .map(|p| p.trim_end_matches('/').to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.login_path.clone(), config.protected_paths.clone())
    }

    /// Whether `path` falls under a protected prefix, on whole segments.
    ///
    /// The path is normalised first. A path that cannot be normalised is
    /// treated as protected.
    pub fn is_protected(&self, path: &str) -> bool {
        let Some(path) = normalize_path(path) else {
            return true;
        };
        if path == self.login_path {
            return false;
        }

        self.protected_paths.iter().any(|prefix| {
            if prefix.is_empty() {
                // "/" protects everything
                return true;
            }
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Decides whether `request` may proceed.
    pub fn authorize<V>(&self, request: &AccessRequest<'_>, sessions: &V) -> Decision
    where
        V: SessionValidator + ?Sized,
    {
        if !self.is_protected(request.path) {
            return Decision::Admit;
        }

        match request.session_token {
            Some(token) if sessions.is_valid(token) => Decision::Admit,
            _ => {
                info!("Redirecting unauthenticated request for {}", request.path);
                Decision::Deny {
                    redirect_to: self.login_path.clone(),
                    message: messages::LOGIN_REQUIRED,
                }
            }
        }
    }
}

/// Reduces a request path to `/seg/seg`: query and fragment dropped,
/// percent-escapes decoded, empty and `.` segments removed, `..` resolved.
///
/// `None` for relative paths, undecodable escapes and `..` above the root.
fn normalize_path(raw: &str) -> Option<String> {
    let raw = raw.split(['?', '#']).next().unwrap_or_default();
    let decoded = urlencoding::decode(raw).ok()?;
    if !decoded.starts_with('/') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            segment => segments.push(segment),
        }
    }
    Some(format!("/{}", segments.join("/")))
}
