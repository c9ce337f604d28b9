//! Conversion between wire frames and domain models.

use hanashi_shared::protocol::{self, Frame, FrameKind, ProtocolError};

use crate::domain::{ChatText, DisplayName, UserDirectory, UserId};

/// Inbound frame translated into domain terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Complete directory, plus the raw entries that were skipped
    DirectorySnapshot {
        directory: UserDirectory,
        rejected: Vec<String>,
    },
    /// Chat text broadcast by `sender`
    Chat { sender: UserId, text: String },
}

/// Decode one text frame received from the server.
pub fn decode_inbound(text: &str) -> Result<InboundFrame, ProtocolError> {
    let frame = Frame::decode(text)?;
    let inbound = match frame.kind {
        FrameKind::DirectorySnapshot => {
            let decoded = protocol::decode_directory(&frame.payload);
            let mut rejected = decoded.rejected;
            let mut entries = Vec::with_capacity(decoded.entries.len());
            for (id, name) in decoded.entries {
                match DisplayName::new(name) {
                    Ok(name) => entries.push((UserId::new(id), name)),
                    Err(e) => rejected.push(format!("{id}: {e}")),
                }
            }
            InboundFrame::DirectorySnapshot {
                directory: UserDirectory::from_entries(entries),
                rejected,
            }
        }
        FrameKind::ChatMessage => InboundFrame::Chat {
            sender: UserId::new(frame.sender_id),
            text: frame.payload,
        },
    };
    Ok(inbound)
}

/// Encode the directory request sent right after the connection opens.
pub fn encode_directory_request(local_id: UserId) -> Result<String, ProtocolError> {
    Frame::directory_request(local_id.value()).encode()
}

/// Encode an outbound chat frame.
pub fn encode_chat(local_id: UserId, text: &ChatText) -> Result<String, ProtocolError> {
    Frame::chat(local_id.value(), text.as_str()).encode()
}
