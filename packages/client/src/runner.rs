//! Client runner: feeds user input into sessions and decides what happens
//! after a session ends.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    config::ClientConfig,
    error::ClientError,
    infrastructure::transport::{CloseReason, Transport, WebSocketTransport},
    session::{ChatSession, ReconnectPolicy},
    ui::ChatSink,
};

/// Run the client until the user leaves or the policy gives up.
///
/// Every line received on `input` is submitted as one chat message; a
/// rejected message is logged and dropped. Closing `input` closes the
/// connection and ends the client.
///
/// # Returns
///
/// * `Ok(CloseReason)` - why the last connection ended
/// * `Err(ClientError)` - the server could not be reached, or the session task failed
pub async fn run_client<S, P>(
    config: ClientConfig,
    sink: S,
    mut input: mpsc::UnboundedReceiver<String>,
    mut policy: P,
) -> Result<CloseReason, ClientError>
where
    S: ChatSink + Send + 'static,
    P: ReconnectPolicy,
{
    let url = config.endpoint_url();
    let mut sink = sink;
    let mut input_open = true;
    let mut attempt: u32 = 0;

    loop {
        let transport: Arc<dyn Transport> = Arc::new(WebSocketTransport::new(url.clone()));
        let (session, handle) = ChatSession::new(config.user_id, transport, sink);
        let mut session_task = tokio::spawn(session.run());

        let end = loop {
            tokio::select! {
                end = &mut session_task => break end?,
                line = input.recv(), if input_open => match line {
                    Some(line) => {
                        if let Err(e) = handle.send_chat(line).await {
                            tracing::warn!("Message not sent: {}", e);
                        }
                    }
                    None => {
                        tracing::info!("Input closed, leaving the chat");
                        input_open = false;
                        handle.close();
                    }
                },
            }
        };

        if !input_open {
            return Ok(end.reason);
        }

        attempt += 1;
        match policy.next_delay(attempt, &end.reason) {
            Some(delay) => {
                tracing::info!(
                    "Reconnecting to {} in {:?} (attempt {})",
                    url,
                    delay,
                    attempt
                );
                tokio::time::sleep(delay).await;
                sink = end.sink;
            }
            None => {
                return match end.reason {
                    CloseReason::HandshakeFailed(reason) => Err(ClientError::Connect { url, reason }),
                    reason => Ok(reason),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::net::TcpListener;

    use crate::{
        domain::UserId,
        session::NoReconnect,
        ui::{ChannelSink, SinkEvent},
    };

    /// Retries immediately, `remaining` times
    struct RetryImmediately {
        remaining: u32,
    }

    impl ReconnectPolicy for RetryImmediately {
        fn next_delay(&mut self, _attempt: u32, _reason: &CloseReason) -> Option<Duration> {
            if self.remaining == 0 {
                return None;
            }
            self.remaining -= 1;
            Some(Duration::ZERO)
        }
    }

    async fn unreachable_config() -> ClientConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        ClientConfig::new("127.0.0.1", port, UserId::new(1)).unwrap()
    }

    #[tokio::test]
    async fn test_run_client_unreachable_server() {
        // テスト項目: 接続できないサーバーでは Connect エラーで終わる
        // given (前提条件):
        let config = unreachable_config().await;
        let (sink, mut events) = ChannelSink::channel();
        let (_input_tx, input) = mpsc::unbounded_channel();

        // when (操作):
        let result = run_client(config, sink, input, NoReconnect).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Connect { .. })));
        assert!(matches!(
            events.try_recv().unwrap(),
            SinkEvent::ConnectionClosed(CloseReason::HandshakeFailed(_))
        ));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_run_client_consults_reconnect_policy() {
        // テスト項目: ポリシーが許す回数だけ新しいセッションで接続し直す
        // given (前提条件):
        let config = unreachable_config().await;
        let (sink, mut events) = ChannelSink::channel();
        let (_input_tx, input) = mpsc::unbounded_channel();

        // when (操作):
        let result = run_client(config, sink, input, RetryImmediately { remaining: 2 }).await;

        // then (期待する結果): 最初の 1 回 + 再接続 2 回 = 3 セッション
        assert!(matches!(result, Err(ClientError::Connect { .. })));
        let mut closed = 0;
        while let Ok(event) = events.try_recv() {
            assert!(matches!(event, SinkEvent::ConnectionClosed(_)));
            closed += 1;
        }
        assert_eq!(closed, 3);
    }
}
