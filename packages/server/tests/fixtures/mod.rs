//! Test fixtures shared by the server integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hanashi_server::domain::UserTable;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::{sleep, timeout},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const WAIT: Duration = Duration::from_secs(5);

/// Users registered on every test server
pub fn test_users() -> UserTable {
    UserTable::new([
        UserTable::parse_entry("1:Alice").unwrap(),
        UserTable::parse_entry("2:Bob").unwrap(),
    ])
}

/// In-process server on an ephemeral port, stopped on drop
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(test_users()).await
    }

    pub async fn start_with(users: UserTable) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let (tx, rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(e) = hanashi_server::serve(listener, users, shutdown).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Self {
            addr,
            shutdown: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws/chat?{}", self.addr, query)
    }

    /// Connect as `user_id` and wait until the server has registered it
    pub async fn connect(&self, user_id: i64) -> Client {
        let before = self.connection_count().await;
        let (client, _) = connect_async(self.ws_url(&format!("id={user_id}")))
            .await
            .expect("Failed to connect");
        self.wait_for_connections(before + 1).await;
        client
    }

    pub async fn connection_count(&self) -> usize {
        let body: serde_json::Value = reqwest::get(format!("{}/api/connections", self.base_url()))
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        body.as_array().map(Vec::len).unwrap_or_default()
    }

    pub async fn wait_for_connections(&self, expected: usize) {
        timeout(WAIT, async {
            while self.connection_count().await != expected {
                sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("server never reached {expected} connections"));
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn send_text(client: &mut Client, text: &str) {
    client
        .send(Message::Text(text.to_owned().into()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame, skipping control frames
pub async fn recv_text(client: &mut Client) -> String {
    timeout(WAIT, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_owned(),
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("WebSocket error: {e}"),
                None => panic!("connection closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for a text frame")
}

/// Assert that no text frame arrives within a short window
pub async fn assert_silent(client: &mut Client) {
    let result = timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "unexpected frame: {result:?}");
}
