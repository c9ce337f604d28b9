//! Sink that forwards every callback as a [`SinkEvent`] over a channel.

use tokio::sync::mpsc;

use crate::{
    domain::{ChatText, DisplayName, UserDirectory},
    infrastructure::transport::CloseReason,
};

use super::sink::ChatSink;

/// One sink callback, as data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    DirectoryReady {
        local_name: Option<DisplayName>,
        directory: UserDirectory,
    },
    LocalEcho {
        name: DisplayName,
        text: String,
    },
    ChatReceived {
        sender: DisplayName,
        text: String,
    },
    SendAvailability(bool),
    ConnectionClosed(CloseReason),
}

/// [`ChatSink`] backed by an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<SinkEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn forward(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Sink event dropped: receiver is gone");
        }
    }
}

impl ChatSink for ChannelSink {
    fn on_directory_ready(&mut self, local_name: Option<&DisplayName>, directory: &UserDirectory) {
        self.forward(SinkEvent::DirectoryReady {
            local_name: local_name.cloned(),
            directory: directory.clone(),
        });
    }

    fn on_local_echo(&mut self, name: &DisplayName, text: &ChatText) {
        self.forward(SinkEvent::LocalEcho {
            name: name.clone(),
            text: text.as_str().to_owned(),
        });
    }

    fn on_chat_received(&mut self, sender: &DisplayName, text: &str) {
        self.forward(SinkEvent::ChatReceived {
            sender: sender.clone(),
            text: text.to_owned(),
        });
    }

    fn on_send_availability_changed(&mut self, enabled: bool) {
        self.forward(SinkEvent::SendAvailability(enabled));
    }

    fn on_connection_closed(&mut self, reason: &CloseReason) {
        self.forward(SinkEvent::ConnectionClosed(reason.clone()));
    }
}
