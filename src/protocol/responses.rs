//! Gateway reply handling
//!
//! Defines reply codes and formatting.

/// Standard gateway reply codes
pub const OK: u16 = 200;
pub const SESSION_CREATED: u16 = 201;
pub const GOODBYE: u16 = 221;
pub const REDIRECT: u16 = 302;
pub const BAD_SUBMISSION: u16 = 400;
pub const AUTH_FAILED: u16 = 401;
pub const TOO_MANY_CLIENTS: u16 = 421;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const INTERNAL_ERROR: u16 = 500;
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Format a gateway reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
