//! UseCase: ユーザー切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断した接続がブロードキャスト対象から外れることを確認
//! - 同じユーザーの他の接続には影響しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続の削除
//! - 異常系：存在しない接続の削除

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, RepositoryError};

/// ユーザー切断のユースケース
pub struct DisconnectUserUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl DisconnectUserUseCase {
    /// 新しい DisconnectUserUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 削除した接続
    /// * `Err(RepositoryError)` - 接続が見つからない
    pub async fn execute(&self, connection_id: ConnectionId) -> Result<Connection, RepositoryError> {
        let connection = self.repository.remove(&connection_id).await?;
        tracing::info!(
            "User {} disconnected ({}), {} connections remain",
            connection.user_id,
            connection.id,
            self.repository.count().await
        );
        Ok(connection)
    }
}
