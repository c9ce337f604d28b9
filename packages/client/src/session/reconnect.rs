//! Decides whether the runner starts a new session after one ends.

use std::time::Duration;

use crate::infrastructure::transport::CloseReason;

/// Consulted by the runner each time a session ends without the user
/// asking for it.
pub trait ReconnectPolicy: Send {
    /// Delay before attempt number `attempt` (starting at 1), or `None` to stop.
    fn next_delay(&mut self, attempt: u32, reason: &CloseReason) -> Option<Duration>;
}

/// Never reconnect; a closed session ends the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReconnect;

impl ReconnectPolicy for NoReconnect {
    fn next_delay(&mut self, _attempt: u32, reason: &CloseReason) -> Option<Duration> {
        tracing::debug!("Not reconnecting after: {}", reason);
        None
    }
}
