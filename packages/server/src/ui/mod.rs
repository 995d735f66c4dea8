//! HTTP and WebSocket surface of the chat room.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{build_app, build_router, run};
