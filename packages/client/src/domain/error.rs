//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName contains a directory separator
    #[error("DisplayName cannot contain '{0}'")]
    DisplayNameInvalidChar(char),

    /// ChatText validation error
    #[error("ChatText cannot be empty")]
    ChatTextEmpty,

    /// ChatText too long error
    #[error("ChatText cannot exceed {max} characters (got {actual})")]
    ChatTextTooLong { max: usize, actual: usize },
}

/// Reasons the send gate refuses a new outbound chat frame
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SendGateError {
    /// The directory request has not completed yet
    #[error("chat is not enabled yet")]
    NotReady,

    /// Another frame is still being sent
    #[error("a previous message is still being sent")]
    InFlight,

    /// The connection is gone
    #[error("the connection is closed")]
    Shut,
}
