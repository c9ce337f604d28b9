//! UseCase 層
//!
//! ハブサーバーのビジネスロジックを実装するレイヤー。
//! UI 層（WebSocket ハンドラ）から呼び出され、Domain 層を操作します。

pub mod broadcast_chat;
pub mod connect_user;
pub mod disconnect_user;
pub mod error;
pub mod receive_frame;
pub mod request_directory;

pub use broadcast_chat::BroadcastChatUseCase;
pub use connect_user::ConnectUserUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use error::{ConnectError, DeliveryError};
pub use receive_frame::{FrameOutcome, ReceiveFrameUseCase};
pub use request_directory::RequestDirectoryUseCase;
