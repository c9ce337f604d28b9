//! Hanashi hub server.
//!
//! Accepts WebSocket clients on `/ws/chat?id=<user id>`, answers directory
//! requests (`0001`) to the requester and relays chat frames (`0002`) to
//! every connected client.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerConfig, ServerError, build_router, run, serve};
