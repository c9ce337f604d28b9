//! Domain layer for the hub server.
//!
//! This module contains the user table and connection model and is
//! independent of axum and of the storage used for live connections.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, DEFAULT_USERS, UserTable};
pub use error::{RepositoryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{ConnectionRepository, Outbox};
pub use value_object::{ChatBody, ConnectionId, Timestamp, UserId, UserName};
