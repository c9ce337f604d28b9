//! Core domain models for the chat client.

use std::collections::BTreeMap;

use super::{
    error::SendGateError,
    value_object::{DisplayName, UserId},
};

/// Mapping from user id to display name, as delivered by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    entries: BTreeMap<UserId, DisplayName>,
}

impl UserDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from entries; a repeated id keeps the last name
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (UserId, DisplayName)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Replace every entry with those of `snapshot`.
    ///
    /// Snapshots are complete, so nothing of the previous content survives.
    pub fn replace_with(&mut self, snapshot: UserDirectory) {
        self.entries = snapshot.entries;
    }

    /// Look up a display name
    pub fn get(&self, id: &UserId) -> Option<&DisplayName> {
        self.entries.get(id)
    }

    /// Look up a display name, falling back to a placeholder on a miss
    pub fn name_or_placeholder(&self, id: &UserId) -> DisplayName {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| DisplayName::placeholder(*id))
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in id order
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &DisplayName)> {
        self.entries.iter()
    }
}

/// The local user: an externally assigned id and, once the directory has
/// arrived, the matching display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    id: UserId,
    name: Option<DisplayName>,
}

impl SessionIdentity {
    /// Create an identity whose name is not resolved yet
    pub fn new(id: UserId) -> Self {
        Self { id, name: None }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    /// Resolved display name, if the directory knows the local id
    pub fn name(&self) -> Option<&DisplayName> {
        self.name.as_ref()
    }

    /// Re-resolve the display name against `directory`
    pub fn resolve(&mut self, directory: &UserDirectory) -> Option<&DisplayName> {
        self.name = directory.get(&self.id).cloned();
        self.name.as_ref()
    }

    /// Name used for local echo: the resolved name or a placeholder
    pub fn echo_name(&self) -> DisplayName {
        self.name
            .clone()
            .unwrap_or_else(|| DisplayName::placeholder(self.id))
    }
}

/// Gate serializing outbound chat frames.
///
/// ```text
/// Locked --open--> Ready --acquire--> InFlight --release--> Ready
///    \               \                   \
///     +----------------+-------------------+--shut--> Shut
/// ```
///
/// A request made while the gate is not `Ready` is refused, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendGate {
    /// Waiting for the directory request to be sent
    #[default]
    Locked,
    /// Chat may be sent
    Ready,
    /// One chat frame is being sent
    InFlight,
    /// The connection closed; nothing can be sent anymore
    Shut,
}

impl SendGate {
    pub fn is_ready(&self) -> bool {
        matches!(self, SendGate::Ready)
    }

    /// Enable chat once the directory request went out.
    ///
    /// Returns `true` if the gate changed.
    pub fn open(&mut self) -> bool {
        if *self == SendGate::Locked {
            *self = SendGate::Ready;
            return true;
        }
        false
    }

    /// Claim the single send slot
    pub fn try_acquire(&mut self) -> Result<(), SendGateError> {
        match self {
            SendGate::Ready => {
                *self = SendGate::InFlight;
                Ok(())
            }
            SendGate::Locked => Err(SendGateError::NotReady),
            SendGate::InFlight => Err(SendGateError::InFlight),
            SendGate::Shut => Err(SendGateError::Shut),
        }
    }

    /// Give the send slot back.
    ///
    /// Returns `true` if the gate changed; a shut gate stays shut.
    pub fn release(&mut self) -> bool {
        if *self == SendGate::InFlight {
            *self = SendGate::Ready;
            return true;
        }
        false
    }

    /// Disable sending for good.
    ///
    /// Returns `true` if the gate had been `Ready` or `InFlight`.
    pub fn shut(&mut self) -> bool {
        let was_enabled = matches!(self, SendGate::Ready | SendGate::InFlight);
        *self = SendGate::Shut;
        was_enabled
    }
}

/// Everything the dispatch loop owns about one session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Local user
    pub identity: SessionIdentity,
    /// Last directory snapshot received
    pub directory: UserDirectory,
    /// Outbound chat serialization
    pub gate: SendGate,
}

impl SessionState {
    /// Create the state of a session that has not connected yet
    pub fn new(local_id: UserId) -> Self {
        Self {
            identity: SessionIdentity::new(local_id),
            directory: UserDirectory::new(),
            gate: SendGate::default(),
        }
    }

    pub fn local_id(&self) -> UserId {
        self.identity.id()
    }
}
