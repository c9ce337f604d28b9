//! UseCase: ディレクトリ要求への応答
//!
//! 要求した接続にだけ、ユーザー表全体を `0001` フレームで返す。

use std::sync::Arc;

use hanashi_shared::protocol::{Frame, FrameKind};

use crate::domain::{ConnectionId, ConnectionRepository, UserId, UserTable};

use super::error::DeliveryError;

/// ディレクトリ要求のユースケース
pub struct RequestDirectoryUseCase {
    users: Arc<UserTable>,
    repository: Arc<dyn ConnectionRepository>,
}

impl RequestDirectoryUseCase {
    /// 新しい RequestDirectoryUseCase を作成
    pub fn new(users: Arc<UserTable>, repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { users, repository }
    }

    /// ディレクトリを要求元に送る
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 要求元の接続
    /// * `requester` - 要求元のユーザー（フレームの `id` になる）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        requester: UserId,
    ) -> Result<(), DeliveryError> {
        let frame = Frame::new(
            FrameKind::DirectorySnapshot,
            requester.value(),
            self.users.directory_payload(),
        )
        .encode()?;

        let outbox = self.repository.outbox(&connection_id).await?;
        outbox
            .send(frame)
            .map_err(|_| DeliveryError::OutboxClosed(connection_id))?;
        tracing::debug!("Sent directory to user {} ({})", requester, connection_id);
        Ok(())
    }
}
