//! Outward-facing callbacks of a chat session.

use crate::{
    domain::{ChatText, DisplayName, UserDirectory},
    infrastructure::transport::CloseReason,
};

/// Receiver of everything a session wants to show to the user.
///
/// The session never renders anything itself; all calls happen on the
/// session task, in the order the underlying events occurred.
pub trait ChatSink {
    /// A directory snapshot was applied.
    ///
    /// `local_name` is `None` when the directory has no entry for the local id.
    fn on_directory_ready(&mut self, local_name: Option<&DisplayName>, directory: &UserDirectory);

    /// A chat accepted by `send_chat`, shown before the server sees it
    fn on_local_echo(&mut self, name: &DisplayName, text: &ChatText);

    /// A chat broadcast by another user
    fn on_chat_received(&mut self, sender: &DisplayName, text: &str);

    /// Chat input became available (`true`) or unavailable (`false`)
    fn on_send_availability_changed(&mut self, enabled: bool);

    /// The connection is gone; called exactly once per session
    fn on_connection_closed(&mut self, reason: &CloseReason);
}
