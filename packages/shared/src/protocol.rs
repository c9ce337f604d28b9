//! Wire protocol shared by the chat client and the reference server.
//!
//! Every frame is a JSON object with three fields:
//!
//! ```text
//! {"protocal": "0002", "id": 1, "data": "hi"}
//! ```
//!
//! `protocal` (sic) carries a four-digit tag, `id` the sender's user id and
//! `data` a string payload. The misspelled field name is part of the wire
//! contract and only appears in the serde attribute below.
//!
//! Directory snapshots encode their payload as `id:name,id:name,...`. The
//! format does not escape anything, so names must not contain `,` or `:`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag of the directory request / snapshot frame.
pub const DIRECTORY_TAG: &str = "0001";

/// Tag of the chat message frame.
pub const CHAT_TAG: &str = "0002";

/// Largest frame the reference server accepts, in bytes.
pub const MAX_FRAME_BYTES: usize = 512;

const ENTRY_SEPARATOR: char = ',';
const FIELD_SEPARATOR: char = ':';

/// Errors raised while decoding or encoding frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Not a JSON object of the expected shape
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Well-formed frame with a tag we do not know
    #[error("unknown frame tag: {0}")]
    UnknownTag(String),
}

/// Kind of a frame, derived from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// `0001`: empty request from a client, directory payload from the server
    DirectorySnapshot,
    /// `0002`: chat text
    ChatMessage,
}

impl FrameKind {
    /// Wire tag of this kind.
    pub fn tag(self) -> &'static str {
        match self {
            FrameKind::DirectorySnapshot => DIRECTORY_TAG,
            FrameKind::ChatMessage => CHAT_TAG,
        }
    }

    /// Look up the kind for a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            DIRECTORY_TAG => Some(FrameKind::DirectorySnapshot),
            CHAT_TAG => Some(FrameKind::ChatMessage),
            _ => None,
        }
    }
}

/// JSON envelope exactly as it travels over the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFrame {
    #[serde(rename = "protocal")]
    pub tag: String,
    pub id: i64,
    #[serde(default)]
    pub data: String,
}

/// Typed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub sender_id: i64,
    pub payload: String,
}

impl Frame {
    /// Create a frame of the given kind.
    pub fn new(kind: FrameKind, sender_id: i64, payload: impl Into<String>) -> Self {
        Self {
            kind,
            sender_id,
            payload: payload.into(),
        }
    }

    /// Directory request sent by a client right after the connection opens.
    pub fn directory_request(sender_id: i64) -> Self {
        Self::new(FrameKind::DirectorySnapshot, sender_id, "")
    }

    /// Chat message frame.
    pub fn chat(sender_id: i64, text: impl Into<String>) -> Self {
        Self::new(FrameKind::ChatMessage, sender_id, text)
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        let wire = WireFrame {
            tag: self.kind.tag().to_string(),
            id: self.sender_id,
            data: self.payload.clone(),
        };
        Ok(serde_json::to_string(&wire)?)
    }

    /// Parse JSON text received from the wire.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let wire: WireFrame = serde_json::from_str(text)?;
        let kind = FrameKind::from_tag(&wire.tag).ok_or(ProtocolError::UnknownTag(wire.tag))?;
        Ok(Self {
            kind,
            sender_id: wire.id,
            payload: wire.data,
        })
    }
}

/// Whether `name` can be carried by the directory payload unchanged.
pub fn is_encodable_name(name: &str) -> bool {
    !name.is_empty() && !name.contains([ENTRY_SEPARATOR, FIELD_SEPARATOR])
}

/// Encode directory entries as `id:name,id:name,...`.
///
/// Entries are written in iteration order. Callers are expected to have
/// validated names with [`is_encodable_name`].
pub fn encode_directory<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    let separator = ENTRY_SEPARATOR.to_string();
    entries
        .into_iter()
        .map(|(id, name)| format!("{id}{FIELD_SEPARATOR}{name}"))
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Result of decoding a directory payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDirectory {
    /// Accepted entries; a repeated id keeps the last name
    pub entries: BTreeMap<i64, String>,
    /// Raw entries that could not be parsed
    pub rejected: Vec<String>,
}

/// Decode a directory payload, skipping malformed entries.
///
/// An empty payload is an empty directory. An entry is malformed when it
/// lacks the `:` separator, its id is not a decimal integer, or its name is
/// empty.
pub fn decode_directory(payload: &str) -> DecodedDirectory {
    let mut decoded = DecodedDirectory::default();
    if payload.is_empty() {
        return decoded;
    }

    for raw in payload.split(ENTRY_SEPARATOR) {
        match parse_entry(raw) {
            Some((id, name)) => {
                decoded.entries.insert(id, name.to_string());
            }
            None => decoded.rejected.push(raw.to_string()),
        }
    }
    decoded
}

fn parse_entry(raw: &str) -> Option<(i64, &str)> {
    let (id, name) = raw.split_once(FIELD_SEPARATOR)?;
    let id = id.trim().parse::<i64>().ok()?;
    is_encodable_name(name).then_some((id, name))
}
