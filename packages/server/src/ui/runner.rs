//! Server bootstrap: router construction and the serve loop.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    domain::{ConnectionRepository, UserTable},
    infrastructure::repository::InMemoryConnectionRepository,
};

use super::{handler, signal, state::AppState};

/// Where to listen and who may connect
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub users: UserTable,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, users: UserTable) -> Self {
        Self {
            host: host.into(),
            port,
            users,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 8080, UserTable::with_defaults())
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws/chat", get(handler::websocket_handler))
        .route("/api/health", get(handler::health_check))
        .route("/api/users", get(handler::list_users))
        .route("/api/connections", get(handler::list_connections))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, users: UserTable, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let repository: Arc<dyn ConnectionRepository> = Arc::new(InMemoryConnectionRepository::new());
    let state = Arc::new(AppState::new(users, repository));

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("Listening on ws://{}/ws/chat", addr);
    for (id, name) in config.users.iter() {
        tracing::info!("Registered user {} ({})", name, id);
    }

    serve(listener, config.users, signal::shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}
