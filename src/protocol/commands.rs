//! Module `commands`
//!
//! Defines the gateway protocol commands and the result of executing one.

/// A request parsed from one protocol line.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Login form submission; absent fields are `None`
    LOGIN {
        username: Option<String>,
        password: Option<String>,
    },
    /// Access check for `path`, with an optional session token
    CHECK { path: String, token: Option<String> },
    /// Describe the login form
    FORM,
    QUIT,
    UNKNOWN,
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}
