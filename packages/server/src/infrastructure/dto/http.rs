//! HTTP API response DTOs for the hub server.

use serde::{Deserialize, Serialize};

/// Entry of the user list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
}

/// Entry of the connection list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDto {
    pub connection_id: String,
    pub user_id: i64,
    pub connected_at: String, // ISO 8601
}
