//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserName validation error
    #[error("UserName cannot be empty")]
    UserNameEmpty,

    /// UserName cannot be carried by the directory payload
    #[error("UserName must not contain ',' or ':' (got: {0})")]
    UserNameNotEncodable(String),

    /// `<id>:<name>` user specification could not be parsed
    #[error("user must be given as <id>:<name> (got: {0})")]
    UserEntryInvalid(String),
}

/// Errors raised by a connection repository
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No live connection with this id
    #[error("connection not found: {0}")]
    ConnectionNotFound(ConnectionId),

    /// A connection with this id is already registered
    #[error("connection already registered: {0}")]
    DuplicateConnection(ConnectionId),
}
