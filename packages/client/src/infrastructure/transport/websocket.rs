//! WebSocket transport built on tokio-tungstenite.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{
    net::TcpStream,
    sync::{Mutex as AsyncMutex, mpsc},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, protocol::CloseFrame},
};

use super::{
    CloseReason, ConnectionState, SendOutcome, StateCell, Transport, TransportError,
    TransportEvent,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

/// Status code used when a close frame carries no code.
const NO_STATUS_CODE: u16 = 1005;

/// State shared with the receive loop
#[derive(Default)]
struct Shared {
    state: StateCell,
    events: Mutex<Option<mpsc::UnboundedSender<TransportEvent>>>,
}

impl Shared {
    fn emit(&self, event: TransportEvent) {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = events.as_ref()
            && tx.send(event).is_err()
        {
            tracing::debug!("Transport event dropped: receiver is gone");
        }
    }

    /// Move to `Closed` and raise the closed event if nobody did yet
    fn close_with(&self, reason: CloseReason) {
        if self.state.finish() {
            tracing::info!("Connection {}", reason);
            self.emit(TransportEvent::Closed(reason));
        }
    }
}

/// One WebSocket connection to a fixed URL.
///
/// The write half sits behind an async mutex (single writer); the read half
/// is owned by the receive loop task (single reader).
pub struct WebSocketTransport {
    url: String,
    shared: Arc<Shared>,
    writer: Arc<AsyncMutex<Option<WsWriter>>>,
    receive_task: Mutex<Option<JoinHandle<()>>>,
}

impl WebSocketTransport {
    /// Create an idle transport for `url` (`ws://host:port/path?query`)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            shared: Arc::new(Shared::default()),
            writer: Arc::new(AsyncMutex::new(None)),
            receive_task: Mutex::new(None),
        }
    }

    fn abort_receive_loop(&self) {
        let task = self
            .receive_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(
        &self,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<(), TransportError> {
        self.shared
            .state
            .transition(ConnectionState::Connecting)
            .map_err(|state| TransportError::InvalidState {
                operation: "connect",
                state,
            })?;
        *self
            .shared
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(events);

        tracing::info!("Connecting to {}", self.url);
        let stream = match connect_async(self.url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                tracing::error!("WebSocket handshake with {} failed: {}", self.url, e);
                self.shared.state.finish();
                return Err(TransportError::Handshake {
                    url: self.url.clone(),
                    source: e,
                });
            }
        };

        let (writer, reader) = stream.split();
        *self.writer.lock().await = Some(writer);

        // close() may have run while the handshake was pending
        if let Err(state) = self.shared.state.transition(ConnectionState::Open) {
            self.writer.lock().await.take();
            return Err(TransportError::InvalidState {
                operation: "open",
                state,
            });
        }
        tracing::info!("Connected to {}", self.url);

        // Opened goes out before the loop can raise any message event
        self.shared.emit(TransportEvent::Opened);
        let task = tokio::spawn(receive_loop(
            reader,
            self.shared.clone(),
            self.writer.clone(),
        ));
        *self
            .receive_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task);

        Ok(())
    }

    async fn send(&self, text: String) -> Result<SendOutcome, TransportError> {
        let state = self.shared.state.get();
        if !state.can_send() {
            tracing::debug!("Dropping outbound frame: transport is {}", state);
            return Ok(SendOutcome::Dropped);
        }

        let mut writer = self.writer.lock().await;
        let Some(sink) = writer.as_mut() else {
            tracing::debug!("Dropping outbound frame: writer already released");
            return Ok(SendOutcome::Dropped);
        };

        match sink.send(Message::Text(text.into())).await {
            Ok(()) => Ok(SendOutcome::Sent),
            Err(e) => {
                tracing::error!("Failed to send frame to {}: {}", self.url, e);
                writer.take();
                drop(writer);
                self.abort_receive_loop();
                self.shared
                    .close_with(CloseReason::Error(format!("send failed: {e}")));
                Err(TransportError::Send(e))
            }
        }
    }

    async fn close(&self) {
        match self.shared.state.get() {
            ConnectionState::Open => {}
            ConnectionState::Connecting => {
                self.shared.close_with(CloseReason::Local);
                return;
            }
            state => {
                tracing::debug!("Ignoring close: transport is {}", state);
                return;
            }
        }
        if self
            .shared
            .state
            .transition(ConnectionState::Closing)
            .is_err()
        {
            // The receive loop is already completing a remote close
            return;
        }

        if let Some(mut writer) = self.writer.lock().await.take()
            && let Err(e) = writer.send(Message::Close(None)).await
        {
            tracing::debug!("Close frame not sent: {}", e);
        }
        self.abort_receive_loop();
        self.shared.close_with(CloseReason::Local);
    }

    fn state(&self) -> ConnectionState {
        self.shared.state.get()
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        self.abort_receive_loop();
    }
}

/// Read frames until the connection leaves `Open`.
async fn receive_loop(
    mut reader: WsReader,
    shared: Arc<Shared>,
    writer: Arc<AsyncMutex<Option<WsWriter>>>,
) {
    while let Some(message) = reader.next().await {
        match message {
            Ok(Message::Text(text)) => {
                tracing::debug!("Received frame: {}", text.as_str());
                shared.emit(TransportEvent::Message(text.as_str().to_owned()));
            }
            Ok(Message::Close(frame)) => {
                if shared.state.transition(ConnectionState::Closing).is_err() {
                    // Reply to our own close(); that path raises the event
                    return;
                }
                // tungstenite queued the close reply; closing the sink flushes it
                if let Some(mut sink) = writer.lock().await.take()
                    && let Err(e) = sink.close().await
                {
                    tracing::debug!("Close handshake not completed: {}", e);
                }
                let (code, reason) = describe_close(frame);
                shared.close_with(CloseReason::Remote { code, reason });
                return;
            }
            Ok(Message::Binary(data)) => {
                tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
            }
            Ok(_) => {
                // ping/pong are answered by tungstenite
            }
            Err(e) => {
                if shared.state.get() != ConnectionState::Open {
                    return;
                }
                tracing::warn!("WebSocket receive error: {}", e);
                writer.lock().await.take();
                shared.close_with(CloseReason::Error(e.to_string()));
                return;
            }
        }

        if shared.state.get() != ConnectionState::Open {
            return;
        }
    }

    if shared.state.get() == ConnectionState::Open {
        writer.lock().await.take();
        shared.close_with(CloseReason::Error(
            "connection ended without a close frame".to_string(),
        ));
    }
}

fn describe_close(frame: Option<CloseFrame>) -> (u16, String) {
    match frame {
        Some(frame) => (u16::from(frame.code), frame.reason.as_str().to_owned()),
        None => (NO_STATUS_CODE, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::{net::TcpListener, time::timeout};
    use tokio_tungstenite::{
        accept_async,
        tungstenite::protocol::frame::coding::CloseCode,
    };

    const WAIT: Duration = Duration::from_secs(5);

    /// How the test peer behaves after accepting one connection
    #[derive(Clone, Copy)]
    enum Peer {
        /// Echo text frames back until the client closes
        Echo,
        /// Send a normal close frame right away
        CloseImmediately,
        /// Drop the socket without a close handshake
        DropWithoutClose,
    }

    async fn spawn_peer(peer: Peer) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            match peer {
                Peer::Echo => {
                    while let Some(Ok(message)) = ws.next().await {
                        if message.is_text() && ws.send(message).await.is_err() {
                            break;
                        }
                    }
                }
                Peer::DropWithoutClose => drop(ws),
                Peer::CloseImmediately => {
                    let _ = ws
                        .close(Some(CloseFrame {
                            code: CloseCode::Normal,
                            reason: "bye".into(),
                        }))
                        .await;
                    while ws.next().await.is_some() {}
                }
            }
        });
        format!("ws://{addr}/ws/chat?id=1")
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> TransportEvent {
        timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for transport event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_send_before_connect_is_dropped() {
        // テスト項目: 接続前の送信は何もせず Dropped を返す
        // given (前提条件):
        let transport = WebSocketTransport::new("ws://127.0.0.1:9/ws/chat?id=1");

        // when (操作):
        let outcome = transport.send("hello".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome, SendOutcome::Dropped);
        assert_eq!(transport.state(), ConnectionState::Idle);
    }

    #[tokio::test]
    async fn test_connect_failure_leaves_transport_closed() {
        // テスト項目: ハンドシェイク失敗で Closed になり、再接続はできない
        // given (前提条件): 誰も listen していないポート
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport = WebSocketTransport::new(format!("ws://{addr}/ws/chat?id=1"));
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = transport.connect(tx.clone()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(TransportError::Handshake { .. })));
        assert_eq!(transport.state(), ConnectionState::Closed);

        let retry = transport.connect(tx).await;
        assert!(matches!(
            retry,
            Err(TransportError::InvalidState {
                operation: "connect",
                state: ConnectionState::Closed
            })
        ));
    }

    #[tokio::test]
    async fn test_send_receive_and_local_close() {
        // テスト項目: 接続 → 送信 → 受信 → クローズの一連の流れ
        // given (前提条件):
        let url = spawn_peer(Peer::Echo).await;
        let transport = WebSocketTransport::new(url);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作): 接続
        transport.connect(tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(next_event(&mut rx).await, TransportEvent::Opened);
        assert_eq!(transport.state(), ConnectionState::Open);

        // when (操作): 送信すると peer がエコーする
        let outcome = transport.send("ping".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome, SendOutcome::Sent);
        assert_eq!(
            next_event(&mut rx).await,
            TransportEvent::Message("ping".to_string())
        );

        // when (操作): ローカルからクローズ
        transport.close().await;

        // then (期待する結果): Closed(Local) が 1 回だけ届き、以降の送信は捨てられる
        assert_eq!(
            next_event(&mut rx).await,
            TransportEvent::Closed(CloseReason::Local)
        );
        assert_eq!(transport.state(), ConnectionState::Closed);
        assert_eq!(
            transport.send("late".to_string()).await.unwrap(),
            SendOutcome::Dropped
        );
        transport.close().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_remote_close_raises_closed() {
        // テスト項目: サーバーからの close フレームで Closed(Remote) が届く
        // given (前提条件):
        let url = spawn_peer(Peer::CloseImmediately).await;
        let transport = WebSocketTransport::new(url);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        transport.connect(tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(next_event(&mut rx).await, TransportEvent::Opened);
        assert_eq!(
            next_event(&mut rx).await,
            TransportEvent::Closed(CloseReason::Remote {
                code: 1000,
                reason: "bye".to_string()
            })
        );
        assert_eq!(transport.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_connection_lost_raises_closed_error() {
        // テスト項目: close フレームなしで切断されると Closed(Error) が届き、以降の送信は捨てられる
        // given (前提条件):
        let url = spawn_peer(Peer::DropWithoutClose).await;
        let transport = WebSocketTransport::new(url);
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        transport.connect(tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(next_event(&mut rx).await, TransportEvent::Opened);
        let closed = next_event(&mut rx).await;
        assert!(
            matches!(closed, TransportEvent::Closed(CloseReason::Error(_))),
            "unexpected event: {closed:?}"
        );
        assert_eq!(transport.state(), ConnectionState::Closed);
        assert_eq!(
            transport.send("late".to_string()).await.unwrap(),
            SendOutcome::Dropped
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_close_reason_display() {
        // テスト項目: 切断理由が読みやすい文字列になる
        assert_eq!(CloseReason::Local.to_string(), "closed locally");
        assert_eq!(
            CloseReason::Remote {
                code: 1000,
                reason: String::new()
            }
            .to_string(),
            "closed by server (code 1000)"
        );
        assert!(CloseReason::Error("boom".to_string()).is_error());
        assert!(!CloseReason::Local.is_error());
    }
}
