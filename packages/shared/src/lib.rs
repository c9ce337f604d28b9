//! Shared utilities for the Hanashi chat client and server.
//!
//! Both sides speak the same tagged JSON protocol, so the frame codec lives
//! here together with the logger setup and time helpers.

pub mod logger;
pub mod protocol;
pub mod time;
