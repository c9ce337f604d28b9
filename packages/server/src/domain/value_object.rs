//! Value objects for the hub server.

use std::fmt;

use hanashi_shared::protocol;

use super::error::ValueObjectError;

/// User identifier, as carried in the `id` query parameter and frame field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of a registered user.
///
/// Must survive the `id:name,...` directory encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Create a new UserName.
    ///
    /// # Returns
    ///
    /// A Result containing the UserName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.trim().is_empty() {
            return Err(ValueObjectError::UserNameEmpty);
        }
        if !protocol::is_encodable_name(&name) {
            return Err(ValueObjectError::UserNameNotEncodable(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one WebSocket connection.
///
/// Several connections may belong to the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    /// Wrap an existing UUID; new ids come from `ConnectionIdFactory`
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat text as relayed to every client: newlines become spaces and the
/// result is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBody(String);

impl ChatBody {
    pub fn sanitize(raw: &str) -> Self {
        Self(raw.replace('\n', " ").trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
