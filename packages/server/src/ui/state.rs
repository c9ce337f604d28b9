//! Server state shared by every handler.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{ConnectionRepository, UserTable};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Raw user id; parsed by the handler so that a bad value maps to 400
    pub id: Option<String>,
}

/// Shared application state
pub struct AppState {
    /// Users allowed to connect
    pub users: Arc<UserTable>,
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn ConnectionRepository>,
}

impl AppState {
    pub fn new(users: UserTable, repository: Arc<dyn ConnectionRepository>) -> Self {
        Self {
            users: Arc::new(users),
            repository,
        }
    }
}
