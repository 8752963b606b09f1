//! Session management
//!
//! Session table and the access guard built on top of it.

pub mod guard;
pub mod store;

pub use guard::{AccessRequest, Decision, SessionGuard};
pub use store::{Session, SessionStore, SessionValidator};
