//! Configuration management for the RAX login gateway
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `RAX_GATEWAY_` environment variables (`__` separates nested keys, e.g.
//! `RAX_GATEWAY_SERVER__LISTEN=0.0.0.0:9000`). Protected paths are given as a
//! comma-separated list: `RAX_GATEWAY_SERVER__PROTECTED_PATHS=/private,/admin`.

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::ConfigError;

/// Config file looked up when none is named on the command line
const DEFAULT_CONFIG: &str = "config";

/// Complete gateway configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub sessions: SessionConfig,

    /// Registered principals. Stands in for the external user store.
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

/// Listener and routing settings (restart required)
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// `host:port` for TCP, or an absolute path for a Unix socket
    pub listen: String,

    /// Octal permissions applied to a Unix socket, e.g. `"660"`
    pub socket_mode: Option<String>,

    /// Maximum concurrent client connections
    pub max_clients: usize,

    /// Maximum length of one protocol line, terminator included
    pub max_line_length: usize,

    /// Entry point unauthenticated clients are redirected to
    pub login_path: String,

    /// Path prefixes that require an active session
    pub protected_paths: Vec<String>,
}

/// Session table settings
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Capacity of the in-memory session table; the oldest session is evicted when full
    pub max_sessions: usize,
}

/// One `[[users]]` entry
#[derive(Debug, Deserialize, Clone)]
pub struct UserEntry {
    pub username: String,
    /// Argon2 PHC string, see `rax-login-gateway hash-password`
    pub password_hash: String,
}

impl GatewayConfig {
    /// Load configuration with environment overrides.
    ///
    /// An explicit `path` must exist (extension optional). Without one,
    /// `config` in the working directory is read if present.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG).required(false),
        };

        let settings = Self::defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix("RAX_GATEWAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.protected_paths"),
            )
            .build()?;

        let config: GatewayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from an in-memory TOML document on top of the defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        let config: GatewayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.listen", "127.0.0.1:8080")?
            .set_default("server.max_clients", 64_i64)?
            .set_default("server.max_line_length", 1024_i64)?
            .set_default("server.login_path", "/login")?
            .set_default("server.protected_paths", vec!["/private"])?
            .set_default("sessions.max_sessions", 100_i64)?)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen.trim().is_empty() {
            return Err(ConfigError::Invalid("server.listen cannot be empty".into()));
        }

        if let Some(mode) = &self.server.socket_mode {
            if u32::from_str_radix(mode, 8).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "server.socket_mode must be an octal string, got {mode:?}"
                )));
            }
        }

        if self.server.max_clients == 0 {
            return Err(ConfigError::Invalid(
                "server.max_clients must be greater than 0".into(),
            ));
        }

        if self.server.max_line_length == 0 {
            return Err(ConfigError::Invalid(
                "server.max_line_length must be greater than 0".into(),
            ));
        }

        if !self.server.login_path.starts_with('/') {
            return Err(ConfigError::Invalid(
                "server.login_path must start with '/'".into(),
            ));
        }

        if let Some(bad) = self
            .server
            .protected_paths
            .iter()
            .find(|p| !p.starts_with('/'))
        {
            return Err(ConfigError::Invalid(format!(
                "protected path {bad:?} must start with '/'"
            )));
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "sessions.max_sessions must be greater than 0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.trim().is_empty() {
                return Err(ConfigError::Invalid("user with empty username".into()));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate user {:?}",
                    user.username
                )));
            }
        }

        Ok(())
    }
}

impl ServerConfig {
    /// Whether `listen` names a Unix socket path rather than a TCP address
    pub fn is_unix_socket(&self) -> bool {
        self.listen.starts_with('/')
    }

    /// Unix socket permissions, already validated as octal
    pub fn socket_mode(&self) -> Option<u32> {
        self.socket_mode
            .as_deref()
            .and_then(|m| u32::from_str_radix(m, 8).ok())
    }
}
