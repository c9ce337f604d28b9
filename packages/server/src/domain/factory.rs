//! Domain factories for creating identifiers.

use super::value_object::ConnectionId;

/// Factory for generating ConnectionId instances.
///
/// Keeps id generation out of the value object, which only wraps a UUID.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(uuid::Uuid::new_v4())
    }
}
