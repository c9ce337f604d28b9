//! UseCase 層
//!
//! セッションの振る舞いを実装するレイヤー。
//! Session（ディスパッチループ）から呼び出され、Domain 層の SessionState を操作します。
//! I/O は行わず、送信すべきフレームや Sink に渡す内容を返します。

pub mod complete_send;
pub mod error;
pub mod receive_frame;
pub mod request_directory;
pub mod send_chat;

pub use complete_send::{CompleteSendUseCase, SendKind};
pub use error::SendChatError;
pub use receive_frame::{InboundOutcome, ReceiveFrameUseCase};
pub use request_directory::RequestDirectoryUseCase;
pub use send_chat::{OutboundChat, SendChatUseCase};
