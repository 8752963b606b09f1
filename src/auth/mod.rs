//! Authentication system
//!
//! Handles user lookup, credential validation, and login processing.

pub mod credentials;
pub mod operations;
pub mod password;
pub mod results;
pub mod validator;

pub use credentials::{InMemoryUserStore, Principal, UserStore};
pub use operations::process_login;
pub use password::{hash_password, verify_password};
pub use results::{LoginOutcome, LoginResult};
pub use validator::validate;
