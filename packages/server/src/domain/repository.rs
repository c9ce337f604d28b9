//! Repository trait for live connections.
//!
//! The domain only states what it needs; the in-memory implementation
//! lives in the infrastructure layer.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{entity::Connection, error::RepositoryError, value_object::ConnectionId};

/// Channel feeding text frames to one connection's writer task
pub type Outbox = UnboundedSender<String>;

/// Live connections and their outboxes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Register a connection
    async fn add(&self, connection: Connection, outbox: Outbox) -> Result<(), RepositoryError>;

    /// Forget a connection, returning what was registered
    async fn remove(&self, id: &ConnectionId) -> Result<Connection, RepositoryError>;

    /// Outbox of one connection
    async fn outbox(&self, id: &ConnectionId) -> Result<Outbox, RepositoryError>;

    /// Outboxes of every live connection
    async fn all_outboxes(&self) -> Vec<(ConnectionId, Outbox)>;

    /// Every live connection, oldest first
    async fn connections(&self) -> Vec<Connection>;

    async fn count(&self) -> usize;
}
