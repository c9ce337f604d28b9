//! UseCase: 受信フレームの振り分け
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReceiveFrameUseCase::execute() メソッド
//! - タグごとの振り分け（0001 → ディレクトリ応答、0002 → ブロードキャスト）
//!
//! ### なぜこのテストが必要か
//! - 不正なフレームや未定義のタグで接続を切らない
//! - クライアントが申告した `id` ではなく接続のユーザー ID を使うことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ディレクトリ要求、チャット
//! - 異常系：JSON として不正、未定義のタグ、`id` の詐称

use std::sync::Arc;

use hanashi_shared::protocol::{Frame, FrameKind};

use crate::domain::{Connection, ConnectionRepository, UserTable};

use super::{
    broadcast_chat::BroadcastChatUseCase, error::DeliveryError,
    request_directory::RequestDirectoryUseCase,
};

/// 受信フレームを処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// 要求元にディレクトリを返した
    DirectorySent,
    /// 全接続にブロードキャストした
    Broadcast { delivered: usize },
    /// 処理せずに捨てた
    Ignored { reason: String },
}

/// 受信フレーム振り分けのユースケース
pub struct ReceiveFrameUseCase {
    directory: RequestDirectoryUseCase,
    broadcast: BroadcastChatUseCase,
}

impl ReceiveFrameUseCase {
    /// 新しい ReceiveFrameUseCase を作成
    pub fn new(users: Arc<UserTable>, repository: Arc<dyn ConnectionRepository>) -> Self {
        Self {
            directory: RequestDirectoryUseCase::new(users, repository.clone()),
            broadcast: BroadcastChatUseCase::new(repository),
        }
    }

    /// 1 フレームを処理
    ///
    /// # Arguments
    ///
    /// * `connection` - フレームを受信した接続
    /// * `text` - 受信したテキスト
    ///
    /// # Returns
    ///
    /// * `Ok(FrameOutcome)` - 処理結果（捨てた場合も含む）
    /// * `Err(DeliveryError)` - 配送失敗
    pub async fn execute(
        &self,
        connection: &Connection,
        text: &str,
    ) -> Result<FrameOutcome, DeliveryError> {
        let frame = match Frame::decode(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Ignoring frame from user {}: {}", connection.user_id, e);
                return Ok(FrameOutcome::Ignored {
                    reason: e.to_string(),
                });
            }
        };
        if frame.sender_id != connection.user_id.value() {
            tracing::debug!(
                "Frame claims id {} on a connection of user {}",
                frame.sender_id,
                connection.user_id
            );
        }

        match frame.kind {
            FrameKind::DirectorySnapshot => {
                self.directory
                    .execute(connection.id, connection.user_id)
                    .await?;
                Ok(FrameOutcome::DirectorySent)
            }
            FrameKind::ChatMessage => {
                let delivered = self
                    .broadcast
                    .execute(connection.user_id, &frame.payload)
                    .await?;
                Ok(FrameOutcome::Broadcast { delivered })
            }
        }
    }
}
