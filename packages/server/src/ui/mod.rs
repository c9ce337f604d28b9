//! WebSocket hub server: routing, handlers and the serve loop.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{ServerConfig, ServerError, build_router, run, serve};
