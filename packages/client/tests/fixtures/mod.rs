//! Test fixtures for the client end-to-end tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use hanashi_client::{
    ChatSession, ClientConfig, SessionEnd, SessionHandle,
    domain::{DisplayName, UserId},
    infrastructure::transport::{Transport, WebSocketTransport},
    ui::{ChannelSink, SinkEvent},
};
use hanashi_server::domain::UserTable;
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::timeout,
};

pub const WAIT: Duration = Duration::from_secs(5);

/// In-process hub with users 1:Alice and 2:Bob, stopped on drop
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let users = UserTable::new([
            UserTable::parse_entry("1:Alice").unwrap(),
            UserTable::parse_entry("2:Bob").unwrap(),
        ]);
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

    pub fn config(&self, user_id: i64) -> ClientConfig {
        ClientConfig::new(self.addr.ip().to_string(), self.addr.port(), UserId::new(user_id))
            .expect("valid test config")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A running session and the events its sink reported
pub struct Participant {
    pub handle: SessionHandle,
    pub events: mpsc::UnboundedReceiver<SinkEvent>,
    pub task: JoinHandle<SessionEnd<ChannelSink>>,
}

impl Participant {
    /// Start a session over a real WebSocket transport
    pub fn spawn(server: &TestServer, user_id: i64) -> Self {
        let url = server.config(user_id).endpoint_url();
        let transport: Arc<dyn Transport> = Arc::new(WebSocketTransport::new(url));
        let (sink, events) = ChannelSink::channel();
        let (session, handle) = ChatSession::new(UserId::new(user_id), transport, sink);
        Self {
            handle,
            events,
            task: tokio::spawn(session.run()),
        }
    }

    /// Start a session and wait until it may chat
    pub async fn join(server: &TestServer, user_id: i64) -> Self {
        let mut participant = Self::spawn(server, user_id);
        participant.wait_until_ready().await;
        participant
    }

    /// Wait for both the directory and the send gate, in either order
    pub async fn wait_until_ready(&mut self) -> Vec<SinkEvent> {
        let mut seen = Vec::new();
        let mut directory = false;
        let mut enabled = false;
        while !(directory && enabled) {
            let event = self.next_event().await;
            match &event {
                SinkEvent::DirectoryReady { .. } => directory = true,
                SinkEvent::SendAvailability(true) => enabled = true,
                _ => {}
            }
            seen.push(event);
        }
        seen
    }

    pub async fn next_event(&mut self) -> SinkEvent {
        next_event(&mut self.events).await
    }

    /// Submit a message, retrying while the previous one is still in flight
    pub async fn say(&self, text: &str) {
        timeout(WAIT, async {
            loop {
                match self.handle.send_chat(text).await {
                    Ok(()) => return,
                    Err(hanashi_client::usecase::SendChatError::SendInFlight) => {
                        tokio::task::yield_now().await
                    }
                    Err(e) => panic!("send_chat failed: {e}"),
                }
            }
        })
        .await
        .expect("timed out submitting a message")
    }
}

pub async fn next_event(events: &mut mpsc::UnboundedReceiver<SinkEvent>) -> SinkEvent {
    timeout(WAIT, events.recv())
        .await
        .expect("timed out waiting for a sink event")
        .expect("sink channel closed")
}

pub fn name(s: &str) -> DisplayName {
    DisplayName::new(s.to_string()).unwrap()
}
