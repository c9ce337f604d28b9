//! Transport abstraction: one duplex text connection with an event channel.
//!
//! A transport moves opaque text frames and knows nothing about the chat
//! protocol. Lifecycle changes and inbound frames are reported as
//! [`TransportEvent`]s on the channel handed to [`Transport::connect`].

mod state;
pub mod websocket;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;

pub use state::ConnectionState;
pub(crate) use state::StateCell;
pub use websocket::WebSocketTransport;

/// Event raised by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed; sends are accepted from now on
    Opened,
    /// One inbound text frame
    Message(String),
    /// The connection is gone; raised exactly once
    Closed(CloseReason),
}

/// Why a connection ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// `close()` was called on our side
    Local,
    /// The peer sent a close frame
    Remote { code: u16, reason: String },
    /// Read or write failure, or the stream ended without a close frame
    Error(String),
    /// The connection never opened
    HandshakeFailed(String),
}

impl CloseReason {
    /// Whether the connection ended without an orderly close
    pub fn is_error(&self) -> bool {
        matches!(self, CloseReason::Error(_) | CloseReason::HandshakeFailed(_))
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::Local => write!(f, "closed locally"),
            CloseReason::Remote { code, reason } if reason.is_empty() => {
                write!(f, "closed by server (code {code})")
            }
            CloseReason::Remote { code, reason } => {
                write!(f, "closed by server (code {code}: {reason})")
            }
            CloseReason::Error(e) => write!(f, "connection error: {e}"),
            CloseReason::HandshakeFailed(e) => write!(f, "could not connect: {e}"),
        }
    }
}

/// Result of a send request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The frame was written to the connection
    Sent,
    /// The transport was not open; the frame was discarded
    Dropped,
}

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// Operation not allowed in the current state
    #[error("cannot {operation} while the transport is {state}")]
    InvalidState {
        operation: &'static str,
        state: ConnectionState,
    },

    /// Opening handshake failed
    #[error("handshake with {url} failed: {source}")]
    Handshake {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    /// Writing a frame failed
    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),
}

/// Duplex text connection.
///
/// Legal operations per state:
///
/// | state        | connect | send            | close |
/// |--------------|---------|-----------------|-------|
/// | `Idle`       | yes     | no-op (dropped) | no-op |
/// | `Connecting` | error   | no-op (dropped) | yes   |
/// | `Open`       | error   | yes             | yes   |
/// | `Closing`    | error   | no-op (dropped) | no-op |
/// | `Closed`     | error   | no-op (dropped) | no-op |
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the connection and start the receive loop.
    ///
    /// Events are delivered on `events` in order, starting with
    /// [`TransportEvent::Opened`].
    async fn connect(
        &self,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<(), TransportError>;

    /// Write one text frame; resolves once the frame is written.
    async fn send(&self, text: String) -> Result<SendOutcome, TransportError>;

    /// Send a close frame and release the connection without waiting for
    /// the peer's reply.
    async fn close(&self);

    /// Current lifecycle state
    fn state(&self) -> ConnectionState;
}
