//! Hiroba chat room server library.
//!
//! One shared chat room served over WebSocket: identity handshake, rate
//! limiting, a daily write quota, a bounded durable transcript and
//! author retraction.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerArgs;
pub use error::ServerError;
pub use ui::run as run_server;
