//! Error types
//!
//! Defines domain-specific error types for each module of the login gateway.

use std::fmt;
use std::io;

/// Failures of the user store collaborator.
///
/// These are infrastructure errors: they never describe whether a user
/// exists and are never shown to the client verbatim.
#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(s) => write!(f, "User store unavailable: {}", s),
            StoreError::Corrupt(s) => write!(f, "User store returned corrupt data: {}", s),
        }
    }
}

impl std::error::Error for StoreError {}

/// Authentication module errors
#[derive(Debug)]
pub enum AuthError {
    HashingFailed(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::HashingFailed(s) => write!(f, "Password hashing failed: {}", s),
        }
    }
}

impl std::error::Error for AuthError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    Load(config::ConfigError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Failed to load configuration: {}", e),
            ConfigError::Invalid(s) => write!(f, "Invalid configuration: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(error: config::ConfigError) -> Self {
        ConfigError::Load(error)
    }
}

/// General gateway error that encompasses all error types
#[derive(Debug)]
pub enum GatewayError {
    Store(StoreError),
    Auth(AuthError),
    Config(ConfigError),
    IoError(io::Error),
    TaskFailed(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Store(e) => write!(f, "Store error: {}", e),
            GatewayError::Auth(e) => write!(f, "Authentication error: {}", e),
            GatewayError::Config(e) => write!(f, "Configuration error: {}", e),
            GatewayError::IoError(e) => write!(f, "I/O error: {}", e),
            GatewayError::TaskFailed(e) => write!(f, "Background task failed: {}", e),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<StoreError> for GatewayError {
    fn from(error: StoreError) -> Self {
        GatewayError::Store(error)
    }
}

impl From<AuthError> for GatewayError {
    fn from(error: AuthError) -> Self {
        GatewayError::Auth(error)
    }
}

impl From<ConfigError> for GatewayError {
    fn from(error: ConfigError) -> Self {
        GatewayError::Config(error)
    }
}

impl From<io::Error> for GatewayError {
    fn from(error: io::Error) -> Self {
        GatewayError::IoError(error)
    }
}
