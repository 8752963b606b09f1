pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod protocol;
pub mod server;
pub mod session;

pub use server::Server;
