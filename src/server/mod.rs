//! Server core functionality
//!
//! This module contains the listener, the shared gateway state, and the
//! accept loop.

pub mod context;
pub mod core;
pub mod listener;

pub use context::GatewayContext;
pub use self::core::Server;
