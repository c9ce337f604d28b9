//! Client-side networking core of the Hanashi chat application.
//!
//! A [`session::ChatSession`] owns one [`infrastructure::transport::Transport`],
//! keeps the local user directory, and routes inbound frames to a
//! [`ui::ChatSink`]. Outbound chat goes through a [`session::SessionHandle`],
//! which serializes sends: one frame in flight at a time.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod runner;
pub mod session;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run_client;
pub use session::{ChatSession, NoReconnect, ReconnectPolicy, SessionEnd, SessionHandle};
