//! Domain layer for the chat client.
//!
//! This module contains the session state that the dispatch loop owns and
//! is independent of the wire format and the transport.

pub mod entity;
pub mod error;
pub mod value_object;

pub use entity::{SendGate, SessionIdentity, SessionState, UserDirectory};
pub use error::{SendGateError, ValueObjectError};
pub use value_object::{ChatText, DisplayName, UserId};
