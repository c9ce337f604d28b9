//! UseCase: ユーザー接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUserUseCase::authorize() / execute() メソッド
//! - ユーザー表の照合と接続の登録
//!
//! ### なぜこのテストが必要か
//! - ユーザー表に無い ID の接続を拒否する
//! - 同じユーザーが複数接続しても、それぞれ別の接続として登録されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みユーザーの接続
//! - 異常系：未登録ユーザーの接続試行

use std::sync::Arc;

use hanashi_shared::time::get_jst_timestamp;

use crate::domain::{
    Connection, ConnectionIdFactory, ConnectionRepository, Outbox, Timestamp, UserId, UserTable,
};

use super::error::ConnectError;

/// ユーザー接続のユースケース
pub struct ConnectUserUseCase {
    /// 接続を許可するユーザー表
    users: Arc<UserTable>,
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl ConnectUserUseCase {
    /// 新しい ConnectUserUseCase を作成
    pub fn new(users: Arc<UserTable>, repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { users, repository }
    }

    /// 接続を受け付けてよいユーザーか確認（WebSocket へのアップグレード前に呼ぶ）
    pub fn authorize(&self, user_id: UserId) -> Result<(), ConnectError> {
        if !self.users.contains(&user_id) {
            return Err(ConnectError::UnknownUser(user_id));
        }
        Ok(())
    }

    /// ユーザー接続を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 接続するユーザーの ID（Domain Model）
    /// * `outbox` - この接続へのフレーム送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 登録された接続
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        user_id: UserId,
        outbox: Outbox,
    ) -> Result<Connection, ConnectError> {
        // 1. ユーザー表の照合
        self.authorize(user_id)?;

        // 2. Repository に接続を追加
        let connection = Connection::new(
            ConnectionIdFactory::generate(),
            user_id,
            Timestamp::new(get_jst_timestamp()),
        );
        self.repository.add(connection.clone(), outbox).await?;

        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryConnectionRepository;
    use tokio::sync::mpsc;

    fn create_usecase() -> (ConnectUserUseCase, Arc<InMemoryConnectionRepository>) {
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let usecase = ConnectUserUseCase::new(Arc::new(UserTable::with_defaults()), repository.clone());
        (usecase, repository)
    }

    #[tokio::test]
    async fn test_connect_known_user() {
        // テスト項目: ユーザー表にあるユーザーは接続できる
        // given (前提条件):
        let (usecase, repository) = create_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let connection = usecase.execute(UserId::new(1), tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(connection.user_id, UserId::new(1));
        assert_eq!(repository.count().await, 1);
    }

    #[tokio::test]
    async fn test_connect_unknown_user_is_rejected() {
        // テスト項目: ユーザー表に無いユーザーは拒否され、登録もされない
        // given (前提条件):
        let (usecase, repository) = create_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(UserId::new(42), tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::UnknownUser(UserId::new(42))));
        assert_eq!(repository.count().await, 0);
        assert!(usecase.authorize(UserId::new(2)).is_ok());
    }

    #[tokio::test]
    async fn test_connect_same_user_twice() {
        // テスト項目: 同じユーザーの 2 本目の接続は別の接続 ID で登録される
        // given (前提条件):
        let (usecase, repository) = create_usecase();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let first = usecase.execute(UserId::new(1), tx.clone()).await.unwrap();
        let second = usecase.execute(UserId::new(1), tx).await.unwrap();

        // then (期待する結果):
        assert_ne!(first.id, second.id);
        assert_eq!(repository.count().await, 2);
    }
}
