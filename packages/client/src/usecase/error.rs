//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{SendGateError, ValueObjectError};

/// チャット送信が受け付けられなかった理由
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendChatError {
    /// ディレクトリ要求の送信が終わっていない
    #[error("chat is not enabled yet")]
    NotReady,

    /// 前のメッセージを送信中
    #[error("a previous message is still being sent")]
    SendInFlight,

    /// 接続が閉じている
    #[error("the connection is closed")]
    Closed,

    /// 本文が不正
    #[error("invalid message: {0}")]
    InvalidText(#[from] ValueObjectError),

    /// エンコード後のフレームがサーバーの上限を超える
    #[error("message too large: encoded frame is {actual} bytes (max {max})")]
    FrameTooLarge { max: usize, actual: usize },

    /// フレームのエンコードに失敗
    #[error("failed to encode frame: {0}")]
    Encode(String),
}

impl From<SendGateError> for SendChatError {
    fn from(e: SendGateError) -> Self {
        match e {
            SendGateError::NotReady => SendChatError::NotReady,
            SendGateError::InFlight => SendChatError::SendInFlight,
            SendGateError::Shut => SendChatError::Closed,
        }
    }
}
