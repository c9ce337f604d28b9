//! Chat session: protocol dispatch over one transport.
//!
//! [`ChatSession::run`] drives a single connection from connect to close on
//! one task. Inbound frames, send completions and requests coming from
//! [`SessionHandle`]s are processed one at a time, so the session state
//! needs no locking.

mod reconnect;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{SessionState, UserId},
    infrastructure::transport::{CloseReason, SendOutcome, Transport, TransportEvent},
    ui::ChatSink,
    usecase::{
        CompleteSendUseCase, InboundOutcome, ReceiveFrameUseCase, RequestDirectoryUseCase,
        SendChatError, SendChatUseCase, SendKind,
    },
};

pub use reconnect::{NoReconnect, ReconnectPolicy};

/// Request sent from a handle to the session task
enum Command {
    SendChat {
        text: String,
        reply: oneshot::Sender<Result<(), SendChatError>>,
    },
    Close,
}

/// Reported by a spawned send once the transport is done with the frame
struct SendCompletion {
    kind: SendKind,
    delivered: bool,
}

/// Cloneable front end of a running session.
///
/// The session closes itself once every handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Submit one chat message.
    ///
    /// Resolves as soon as the session accepted or rejected the message;
    /// an accepted message is echoed locally before this returns, while the
    /// frame itself is still being written.
    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), SendChatError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::SendChat {
                text: text.into(),
                reply,
            })
            .map_err(|_| SendChatError::Closed)?;
        response.await.unwrap_or(Err(SendChatError::Closed))
    }

    /// Ask the session to close the connection
    pub fn close(&self) {
        if self.commands.send(Command::Close).is_err() {
            tracing::debug!("Close requested after the session ended");
        }
    }

    /// Whether the session has already ended
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// What [`ChatSession::run`] hands back
pub struct SessionEnd<S> {
    pub reason: CloseReason,
    /// The sink, returned so that a follow-up session can reuse it
    pub sink: S,
}

/// One user's connection and protocol state
pub struct ChatSession<S> {
    state: SessionState,
    transport: Arc<dyn Transport>,
    sink: S,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl<S> ChatSession<S>
where
    S: ChatSink + Send + 'static,
{
    /// Create a session for `local_id` over an idle transport
    pub fn new(local_id: UserId, transport: Arc<dyn Transport>, sink: S) -> (Self, SessionHandle) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let session = Self {
            state: SessionState::new(local_id),
            transport,
            sink,
            commands,
        };
        (
            session,
            SessionHandle {
                commands: commands_tx,
            },
        )
    }

    /// Connect and dispatch until the connection closes.
    ///
    /// The sink sees `on_connection_closed` exactly once, as the last call.
    pub async fn run(mut self) -> SessionEnd<S> {
        let (events_tx, mut events) = mpsc::unbounded_channel();
        tracing::info!("Starting session for user {}", self.state.local_id());
        if let Err(e) = self.transport.connect(events_tx).await {
            return self.finish(CloseReason::HandshakeFailed(e.to_string()));
        }

        let (done_tx, mut completions) = mpsc::unbounded_channel();
        let mut accepting_commands = true;
        let reason = loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(TransportEvent::Opened) => self.on_opened(&done_tx),
                    Some(TransportEvent::Message(text)) => self.on_message(&text),
                    Some(TransportEvent::Closed(reason)) => break reason,
                    None => break CloseReason::Error("transport stopped reporting events".to_string()),
                },
                Some(completion) = completions.recv() => self.on_send_completed(completion),
                command = self.commands.recv(), if accepting_commands => match command {
                    Some(Command::SendChat { text, reply }) => {
                        let result = self.send_chat(text, &done_tx);
                        if reply.send(result).is_err() {
                            tracing::debug!("Chat submitter went away before the reply");
                        }
                    }
                    Some(Command::Close) => self.spawn_close(),
                    None => {
                        tracing::debug!("Every session handle dropped, closing");
                        accepting_commands = false;
                        self.spawn_close();
                    }
                },
            }
        };

        self.finish(reason)
    }

    fn on_opened(&mut self, done: &mpsc::UnboundedSender<SendCompletion>) {
        match RequestDirectoryUseCase::new(&self.state).execute() {
            Ok(frame) => self.spawn_send(SendKind::DirectoryRequest, frame, done),
            Err(e) => tracing::error!("Failed to encode directory request: {}", e),
        }
    }

    fn on_message(&mut self, text: &str) {
        match ReceiveFrameUseCase::new(&mut self.state).execute(text) {
            InboundOutcome::DirectoryUpdated { local_name, .. } => {
                self.sink
                    .on_directory_ready(local_name.as_ref(), &self.state.directory);
            }
            InboundOutcome::ChatReceived { sender, text, .. } => {
                self.sink.on_chat_received(&sender, &text);
            }
            InboundOutcome::OwnEchoSuppressed | InboundOutcome::Dropped { .. } => {}
        }
    }

    fn send_chat(
        &mut self,
        text: String,
        done: &mpsc::UnboundedSender<SendCompletion>,
    ) -> Result<(), SendChatError> {
        let outbound = SendChatUseCase::new(&mut self.state)
            .execute(text)
            .inspect_err(|e| tracing::debug!("Chat rejected: {}", e))?;

        self.sink.on_local_echo(&outbound.echo_name, &outbound.text);
        self.spawn_send(SendKind::Chat, outbound.frame, done);
        Ok(())
    }

    fn on_send_completed(&mut self, completion: SendCompletion) {
        if let Some(enabled) = CompleteSendUseCase::new(&mut self.state)
            .execute(completion.kind, completion.delivered)
        {
            self.sink.on_send_availability_changed(enabled);
        }
    }

    /// Write `frame` on its own task and report back on `done`
    fn spawn_send(&self, kind: SendKind, frame: String, done: &mpsc::UnboundedSender<SendCompletion>) {
        let transport = self.transport.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let delivered = match transport.send(frame).await {
                Ok(SendOutcome::Sent) => true,
                Ok(SendOutcome::Dropped) => {
                    tracing::debug!("{:?} frame dropped by the transport", kind);
                    false
                }
                Err(e) => {
                    tracing::warn!("{:?} frame not sent: {}", kind, e);
                    false
                }
            };
            // The session may already be gone
            let _ = done.send(SendCompletion { kind, delivered });
        });
    }

    /// Close on its own task; a write stuck in flight must not stall dispatch.
    /// The transport reports the outcome as a `Closed` event.
    fn spawn_close(&self) {
        let transport = self.transport.clone();
        tokio::spawn(async move { transport.close().await });
    }

    fn finish(mut self, reason: CloseReason) -> SessionEnd<S> {
        if self.state.gate.shut() {
            self.sink.on_send_availability_changed(false);
        }
        tracing::info!(
            "Session for user {} ended: {}",
            self.state.local_id(),
            reason
        );
        self.sink.on_connection_closed(&reason);
        SessionEnd {
            reason,
            sink: self.sink,
        }
    }
}
