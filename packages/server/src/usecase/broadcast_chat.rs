//! UseCase: チャットのブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastChatUseCase::execute() メソッド
//! - 本文の整形とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にも届くこと（クライアント側で自分の発言を捨てる前提）
//! - フレームの `id` がクライアントの申告ではなく接続のユーザー ID になることを確認
//! - 送信タスクが終了した接続があっても他の接続には届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数接続へのブロードキャスト
//! - エッジケース：改行を含む本文、切断途中の接続

use std::sync::Arc;

use hanashi_shared::protocol::Frame;

use crate::domain::{ChatBody, ConnectionRepository, UserId};

use super::error::DeliveryError;

/// チャットブロードキャストのユースケース
pub struct BroadcastChatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ConnectionRepository>,
}

impl BroadcastChatUseCase {
    /// 新しい BroadcastChatUseCase を作成
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// ブロードキャストを実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の接続のユーザー ID
    /// * `text` - 受信した本文（整形前）
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配送できた接続の数（送信者を含む）
    /// * `Err(DeliveryError)` - エンコード失敗
    pub async fn execute(&self, sender: UserId, text: &str) -> Result<usize, DeliveryError> {
        // 1. 改行を空白にして前後を取り除く
        let body = ChatBody::sanitize(text);
        let frame = Frame::chat(sender.value(), body.as_str()).encode()?;

        // 2. 送信者を含む全接続に配送
        let mut delivered = 0;
        for (connection_id, outbox) in self.repository.all_outboxes().await {
            if outbox.send(frame.clone()).is_err() {
                tracing::warn!("Failed to deliver chat to connection {}", connection_id);
                continue;
            }
            delivered += 1;
        }
        tracing::info!("Broadcast chat from user {} to {} connections", sender, delivered);
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::UserTable, infrastructure::repository::InMemoryConnectionRepository,
        usecase::ConnectUserUseCase,
    };
    use tokio::sync::mpsc;

    fn create_test_repository() -> (Arc<InMemoryConnectionRepository>, ConnectUserUseCase) {
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let connect =
            ConnectUserUseCase::new(Arc::new(UserTable::with_defaults()), repository.clone());
        (repository, connect)
    }

    #[tokio::test]
    async fn test_broadcast_reaches_everyone_including_sender() {
        // テスト項目: 送信者を含む全接続に、送信者の ID 付きで届く
        // given (前提条件):
        let (repository, connect) = create_test_repository();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        connect.execute(UserId::new(1), tx1).await.unwrap();
        connect.execute(UserId::new(2), tx2).await.unwrap();
        let usecase = BroadcastChatUseCase::new(repository);

        // when (操作):
        let delivered = usecase.execute(UserId::new(2), "yo").await.unwrap();

        // then (期待する結果):
        let expected = r#"{"protocal":"0002","id":2,"data":"yo"}"#;
        assert_eq!(delivered, 2);
        assert_eq!(rx1.try_recv().unwrap(), expected);
        assert_eq!(rx2.try_recv().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_broadcast_sanitizes_text() {
        // テスト項目: 改行は空白になり、前後の空白は取り除かれる
        // given (前提条件):
        let (repository, connect) = create_test_repository();
        let (tx, mut rx) = mpsc::unbounded_channel();
        connect.execute(UserId::new(1), tx).await.unwrap();
        let usecase = BroadcastChatUseCase::new(repository);

        // when (操作):
        usecase.execute(UserId::new(1), " line one\nline two \n").await.unwrap();

        // then (期待する結果):
        assert_eq!(
            rx.try_recv().unwrap(),
            r#"{"protocal":"0002","id":1,"data":"line one line two"}"#
        );
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_outbox() {
        // テスト項目: 送信タスクが終了した接続は飛ばし、他の接続には届く
        // given (前提条件):
        let (repository, connect) = create_test_repository();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        connect.execute(UserId::new(1), tx1).await.unwrap();
        connect.execute(UserId::new(2), tx2).await.unwrap();
        drop(rx1);
        let usecase = BroadcastChatUseCase::new(repository);

        // when (操作):
        let delivered = usecase.execute(UserId::new(1), "hi").await.unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx2.try_recv().is_ok());
    }
}
