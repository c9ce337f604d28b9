//! UseCase 層のエラー定義

use hanashi_shared::protocol::ProtocolError;
use thiserror::Error;

use crate::domain::{ConnectionId, RepositoryError, UserId};

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// ユーザー表に存在しない ID
    #[error("user not found: {0}")]
    UnknownUser(UserId),

    /// 接続の登録に失敗
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// フレーム配送のエラー
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// フレームのエンコードに失敗
    #[error("failed to encode frame: {0}")]
    Encode(#[from] ProtocolError),

    /// 配送先の接続が見つからない
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// 配送先の送信タスクが終了している
    #[error("outbox of connection {0} is closed")]
    OutboxClosed(ConnectionId),
}
