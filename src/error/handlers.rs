//! Error handlers
//!
//! Provides error logging and the mapping from errors to reply codes.

use crate::error::types::GatewayError;
use crate::protocol::responses::{INTERNAL_ERROR, SERVICE_UNAVAILABLE};
use log::error;

/// Handle a gateway error
pub fn handle_error(err: &GatewayError) {
    error!("Gateway Error: {}", err);
}

/// Convert error to gateway reply code
pub fn error_to_reply_code(err: &GatewayError) -> u16 {
    match err {
        GatewayError::Store(_) => SERVICE_UNAVAILABLE,
        GatewayError::Auth(_) => INTERNAL_ERROR,
        GatewayError::Config(_) => INTERNAL_ERROR,
        GatewayError::IoError(_) => INTERNAL_ERROR,
        GatewayError::TaskFailed(_) => INTERNAL_ERROR,
    }
}
