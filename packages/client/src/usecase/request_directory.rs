//! UseCase: ディレクトリ要求
//!
//! 接続が開いた直後に送る `0001` フレームを組み立てる。

use hanashi_shared::protocol::ProtocolError;

use crate::{domain::SessionState, infrastructure::codec};

/// ディレクトリ要求のユースケース
pub struct RequestDirectoryUseCase<'a> {
    state: &'a SessionState,
}

impl<'a> RequestDirectoryUseCase<'a> {
    /// 新しい RequestDirectoryUseCase を作成
    pub fn new(state: &'a SessionState) -> Self {
        Self { state }
    }

    /// ディレクトリ要求フレームを生成
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - 送信するフレーム（JSON テキスト）
    /// * `Err(ProtocolError)` - エンコード失敗
    pub fn execute(&self) -> Result<String, ProtocolError> {
        let frame = codec::encode_directory_request(self.state.local_id())?;
        tracing::debug!("Requesting directory for user {}", self.state.local_id());
        Ok(frame)
    }
}
