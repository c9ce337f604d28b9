//! UseCase: 受信フレームの処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReceiveFrameUseCase::execute() メソッド
//! - デコード、種類ごとの振り分け、ディレクトリの更新
//!
//! ### なぜこのテストが必要か
//! - 不正なフレームでディスパッチが止まると以降のメッセージが一切届かなくなる
//! - 自分の発言はローカルエコー済みなので二重表示してはいけない
//! - ディレクトリに無い送信者でもクラッシュせず仮名で表示する
//!
//! ### どのような状況を想定しているか
//! - 正常系：ディレクトリ受信、他者のチャット受信
//! - エッジケース：自分の発言、ディレクトリの再受信、未登録の送信者
//! - 異常系：JSON として不正、未定義のタグ、有効なエントリが 1 件もないディレクトリ

use crate::{
    domain::{DisplayName, SessionState, UserId},
    infrastructure::codec::{self, InboundFrame},
};

/// 受信フレームを処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// ディレクトリを置き換えた
    DirectoryUpdated {
        /// 解決できた自分の表示名
        local_name: Option<DisplayName>,
        /// ディレクトリの件数
        entries: usize,
    },
    /// 他のユーザーからのチャット
    ChatReceived {
        sender_id: UserId,
        sender: DisplayName,
        text: String,
    },
    /// 自分の発言（ローカルエコー済み）
    OwnEchoSuppressed,
    /// デコードできなかったフレーム
    Dropped { reason: String },
}

/// 受信フレーム処理のユースケース
pub struct ReceiveFrameUseCase<'a> {
    state: &'a mut SessionState,
}

impl<'a> ReceiveFrameUseCase<'a> {
    /// 新しい ReceiveFrameUseCase を作成
    pub fn new(state: &'a mut SessionState) -> Self {
        Self { state }
    }

    /// 受信フレームを処理
    ///
    /// 失敗しても panic せず、`InboundOutcome::Dropped` を返す。
    /// その場合 SessionState は変更されない。
    pub fn execute(self, text: &str) -> InboundOutcome {
        let inbound = match codec::decode_inbound(text) {
            Ok(inbound) => inbound,
            Err(e) => {
                tracing::warn!("Dropping undecodable frame: {}", e);
                return InboundOutcome::Dropped {
                    reason: e.to_string(),
                };
            }
        };

        match inbound {
            InboundFrame::DirectorySnapshot {
                directory,
                rejected,
            } => {
                // 有効なエントリが 1 件もないスナップショットは壊れたフレームとして扱う
                if directory.is_empty() && !rejected.is_empty() {
                    tracing::warn!(
                        "Dropping directory with no valid entries: {:?}",
                        rejected
                    );
                    return InboundOutcome::Dropped {
                        reason: format!("directory has no valid entry ({} rejected)", rejected.len()),
                    };
                }
                if !rejected.is_empty() {
                    tracing::warn!(
                        "Skipped {} malformed directory entries: {:?}",
                        rejected.len(),
                        rejected
                    );
                }

                // 1. 追記ではなく置き換え（後勝ち）
                self.state.directory.replace_with(directory);

                // 2. 自分の表示名を解決
                let local_name = self
                    .state
                    .identity
                    .resolve(&self.state.directory)
                    .cloned();
                match &local_name {
                    Some(name) => tracing::info!(
                        "Directory received ({} users), signed in as {}",
                        self.state.directory.len(),
                        name
                    ),
                    None => tracing::warn!(
                        "Directory received ({} users) but it has no entry for user {}",
                        self.state.directory.len(),
                        self.state.local_id()
                    ),
                }

                InboundOutcome::DirectoryUpdated {
                    local_name,
                    entries: self.state.directory.len(),
                }
            }
            InboundFrame::Chat { sender, text } => {
                if sender == self.state.local_id() {
                    tracing::debug!("Suppressing echo of own message");
                    return InboundOutcome::OwnEchoSuppressed;
                }

                if !self.state.directory.contains(&sender) {
                    tracing::warn!("Chat from user {} missing from the directory", sender);
                }
                let name = self.state.directory.name_or_placeholder(&sender);
                InboundOutcome::ChatReceived {
                    sender_id: sender,
                    sender: name,
                    text,
                }
            }
        }
    }
}
