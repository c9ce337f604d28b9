//! Core domain models for the hub server.

use std::collections::BTreeMap;

use hanashi_shared::protocol;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, Timestamp, UserId, UserName},
};

/// Users the server accepts when `--user` is not given
pub const DEFAULT_USERS: &[(i64, &str)] = &[(1, "Clement"), (2, "LockStar")];

/// Fixed table of users allowed to connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTable {
    users: BTreeMap<UserId, UserName>,
}

impl UserTable {
    /// Build a table from entries; a repeated id keeps the last name
    pub fn new<I>(users: I) -> Self
    where
        I: IntoIterator<Item = (UserId, UserName)>,
    {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// The built-in table
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_USERS.iter().filter_map(|&(id, name)| {
            UserName::new(name.to_string())
                .ok()
                .map(|name| (UserId::new(id), name))
        }))
    }

    /// Parse `<id>:<name>` as given on the command line
    pub fn parse_entry(entry: &str) -> Result<(UserId, UserName), ValueObjectError> {
        let invalid = || ValueObjectError::UserEntryInvalid(entry.to_string());
        let (id, name) = entry.split_once(':').ok_or_else(invalid)?;
        let id = id.trim().parse::<i64>().map_err(|_| invalid())?;
        let name = UserName::new(name.trim().to_string())?;
        Ok((UserId::new(id), name))
    }

    pub fn get(&self, id: &UserId) -> Option<&UserName> {
        self.users.get(id)
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.users.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterate users in id order
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &UserName)> {
        self.users.iter()
    }

    /// Directory payload `id:name,id:name,...` in id order
    pub fn directory_payload(&self) -> String {
        protocol::encode_directory(
            self.users
                .iter()
                .map(|(id, name)| (id.value(), name.as_str())),
        )
    }
}

impl Default for UserTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One live WebSocket connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub user_id: UserId,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, user_id: UserId, connected_at: Timestamp) -> Self {
        Self {
            id,
            user_id,
            connected_at,
        }
    }
}
