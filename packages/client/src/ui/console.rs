//! Line-oriented terminal rendering of a chat session.

use std::io::{self, Stdout, Write};

use hanashi_shared::time::{format_jst_clock, get_jst_timestamp};

use crate::{
    domain::{ChatText, DisplayName, UserDirectory},
    infrastructure::transport::CloseReason,
};

use super::sink::ChatSink;

/// [`ChatSink`] that prints one line per event, prefixed with the JST clock
pub struct ConsoleSink<W: Write = Stdout> {
    out: W,
}

impl ConsoleSink<Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleSink<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Render into an arbitrary writer
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        let clock = format_jst_clock(get_jst_timestamp());
        if let Err(e) = writeln!(self.out, "[{clock}] {text}").and_then(|()| self.out.flush()) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write> ChatSink for ConsoleSink<W> {
    fn on_directory_ready(&mut self, local_name: Option<&DisplayName>, directory: &UserDirectory) {
        let users = directory
            .iter()
            .map(|(id, name)| format!("{name} (#{id})"))
            .collect::<Vec<_>>()
            .join(", ");
        match local_name {
            Some(name) => self.line(format_args!("Signed in as {name}. Users: {users}")),
            None => self.line(format_args!("Users: {users}")),
        }
    }

    fn on_local_echo(&mut self, name: &DisplayName, text: &ChatText) {
        self.line(format_args!("{name} (you): {text}"));
    }

    fn on_chat_received(&mut self, sender: &DisplayName, text: &str) {
        self.line(format_args!("{sender}: {text}"));
    }

    fn on_send_availability_changed(&mut self, enabled: bool) {
        if enabled {
            self.line(format_args!("Chat enabled. Type a message, /quit to leave."));
        } else {
            self.line(format_args!("Chat disabled."));
        }
    }

    fn on_connection_closed(&mut self, reason: &CloseReason) {
        self.line(format_args!("Connection {reason}."));
    }
}
