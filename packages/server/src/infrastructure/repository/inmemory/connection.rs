//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, Outbox, RepositoryError};

/// 登録済みの接続と、その接続への送信チャンネル
struct Entry {
    connection: Connection,
    outbox: Outbox,
}

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    entries: Mutex<HashMap<ConnectionId, Entry>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn add(&self, connection: Connection, outbox: Outbox) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(&connection.id) {
            return Err(RepositoryError::DuplicateConnection(connection.id));
        }
        entries.insert(connection.id, Entry { connection, outbox });
        Ok(())
    }

    async fn remove(&self, id: &ConnectionId) -> Result<Connection, RepositoryError> {
        let mut entries = self.entries.lock().await;
        entries
            .remove(id)
            .map(|entry| entry.connection)
            .ok_or(RepositoryError::ConnectionNotFound(*id))
    }

    async fn outbox(&self, id: &ConnectionId) -> Result<Outbox, RepositoryError> {
        let entries = self.entries.lock().await;
        entries
            .get(id)
            .map(|entry| entry.outbox.clone())
            .ok_or(RepositoryError::ConnectionNotFound(*id))
    }

    async fn all_outboxes(&self) -> Vec<(ConnectionId, Outbox)> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .map(|(id, entry)| (*id, entry.outbox.clone()))
            .collect()
    }

    async fn connections(&self) -> Vec<Connection> {
        let entries = self.entries.lock().await;
        let mut connections: Vec<Connection> =
            entries.values().map(|entry| entry.connection.clone()).collect();
        connections.sort_by_key(|c| c.connected_at);
        connections
    }

    async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }
}
