//! Client configuration.

use crate::{domain::UserId, error::ClientError};

/// Path of the chat endpoint on the server
pub const CHAT_PATH: &str = "/ws/chat";

/// Where to connect and as whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub user_id: UserId,
}

impl ClientConfig {
    /// Create a configuration, rejecting hosts that cannot appear in a URL authority
    pub fn new(host: impl Into<String>, port: u16, user_id: UserId) -> Result<Self, ClientError> {
        let host = host.into();
        if host.is_empty() {
            return Err(ClientError::Config("host must not be empty".to_string()));
        }
        if let Some(c) = host
            .chars()
            .find(|c| matches!(c, '/' | '?' | '#' | '@') || c.is_whitespace())
        {
            return Err(ClientError::Config(format!("host {host:?} contains {c:?}")));
        }
        Ok(Self {
            host,
            port,
            user_id,
        })
    }

    /// `ws://<host>:<port>/ws/chat?id=<user id>`
    pub fn endpoint_url(&self) -> String {
        format!(
            "ws://{}:{}{}?id={}",
            self.host, self.port, CHAT_PATH, self.user_id
        )
    }
}
