//! Connection state machine.

use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

/// Lifecycle of one connection.
///
/// ```text
/// Idle -> Connecting -> Open -> Closing -> Closed
///              \________________________/^
/// ```
///
/// There is no way out of `Closed`: a transport is single-use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closing,
    Closed,
}

impl ConnectionState {
    /// Whether `self -> next` is an edge of the state machine
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Idle, Connecting)
                | (Connecting, Open)
                | (Connecting, Closed)
                | (Open, Closing)
                | (Closing, Closed)
        )
    }

    pub fn can_connect(self) -> bool {
        self == ConnectionState::Idle
    }

    pub fn can_send(self) -> bool {
        self == ConnectionState::Open
    }

    pub fn is_closed(self) -> bool {
        self == ConnectionState::Closed
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// State shared between a transport and its receive loop.
#[derive(Debug, Default)]
pub(crate) struct StateCell(Mutex<ConnectionState>);

impl StateCell {
    pub(crate) fn get(&self) -> ConnectionState {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `next`, returning the current state on an illegal edge.
    pub(crate) fn transition(&self, next: ConnectionState) -> Result<(), ConnectionState> {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.can_transition_to(next) {
            return Err(*state);
        }
        tracing::trace!("Connection state {} -> {}", *state, next);
        *state = next;
        Ok(())
    }

    /// Drive the connection to `Closed` along legal edges; an `Open`
    /// connection goes through `Closing` first, all under one lock.
    ///
    /// Returns `true` only for the call that reached `Closed`, so the closed
    /// event is raised once.
    pub(crate) fn finish(&self) -> bool {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, ConnectionState::Idle | ConnectionState::Closed) {
            return false;
        }
        if *state == ConnectionState::Open {
            advance(&mut state, ConnectionState::Closing);
        }
        advance(&mut state, ConnectionState::Closed);
        true
    }
}

fn advance(state: &mut ConnectionState, next: ConnectionState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal edge {state} -> {next}"
    );
    tracing::trace!("Connection state {} -> {}", *state, next);
    *state = next;
}
