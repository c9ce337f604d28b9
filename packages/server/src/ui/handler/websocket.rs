//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use hanashi_shared::protocol::MAX_FRAME_BYTES;
use tokio::sync::mpsc;

use crate::{
    domain::UserId,
    ui::state::{AppState, ConnectQuery},
    usecase::{ConnectUserUseCase, DisconnectUserUseCase, ReceiveFrameUseCase},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let raw_id = query.id.unwrap_or_default();

    // Convert String -> UserId (Domain Model)
    let user_id = match raw_id.trim().parse::<i64>() {
        Ok(id) => UserId::new(id),
        Err(_) => {
            tracing::warn!("Invalid user id: '{}'", raw_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let connect_usecase = ConnectUserUseCase::new(state.users.clone(), state.repository.clone());
    if let Err(e) = connect_usecase.authorize(user_id) {
        tracing::warn!("Rejecting connection: {}", e);
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(ws
        .max_message_size(MAX_FRAME_BYTES)
        .on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: UserId) {
    let (mut sender, mut receiver) = socket.split();

    // Every frame for this client goes through its outbox, so only the send task writes
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let connect_usecase = ConnectUserUseCase::new(state.users.clone(), state.repository.clone());
    let connection = match connect_usecase.execute(user_id, tx).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Failed to register user {}: {}", user_id, e);
            return;
        }
    };
    tracing::info!("User {} connected ({})", user_id, connection.id);

    let receive_usecase = ReceiveFrameUseCase::new(state.users.clone(), state.repository.clone());
    let reader_connection = connection.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(
                        "WebSocket error from user {}: {}",
                        reader_connection.user_id,
                        e
                    );
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text: {}", text.as_str());
                    if let Err(e) = receive_usecase
                        .execute(&reader_connection, text.as_str())
                        .await
                    {
                        tracing::warn!("Failed to handle frame: {}", e);
                    }
                }
                Message::Binary(data) => {
                    tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                }
                Message::Close(_) => {
                    tracing::info!("User {} requested close", reader_connection.user_id);
                    break;
                }
                _ => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
            }
        }
    });

    // Spawn a task to forward queued frames to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect_usecase = DisconnectUserUseCase::new(state.repository.clone());
    if let Err(e) = disconnect_usecase.execute(connection.id).await {
        tracing::warn!("Failed to unregister user {}: {}", user_id, e);
    }
}
