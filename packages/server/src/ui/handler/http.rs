//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use hanashi_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    infrastructure::dto::http::{ConnectionDto, UserDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Registered users, sorted by id
pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserDto>> {
    let users = state
        .users
        .iter()
        .map(|(id, name)| UserDto {
            id: id.value(),
            name: name.as_str().to_string(),
        })
        .collect();
    Json(users)
}

/// Live connections, oldest first (for debugging and tests)
pub async fn list_connections(State(state): State<Arc<AppState>>) -> Json<Vec<ConnectionDto>> {
    let connections = state
        .repository
        .connections()
        .await
        .into_iter()
        .map(|c| ConnectionDto {
            connection_id: c.id.to_string(),
            user_id: c.user_id.value(),
            connected_at: timestamp_to_jst_rfc3339(c.connected_at.value()),
        })
        .collect();
    Json(connections)
}
