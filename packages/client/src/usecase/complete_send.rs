//! UseCase: 送信完了の処理
//!
//! トランスポートへの書き込みが終わったときに送信ゲートを更新する。
//! ディレクトリ要求の完了でチャットが有効になり、チャットの完了で次の送信が可能になる。

use crate::domain::SessionState;

/// 完了した送信の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKind {
    /// 接続直後の 0001 フレーム
    DirectoryRequest,
    /// 0002 フレーム
    Chat,
}

/// 送信完了処理のユースケース
pub struct CompleteSendUseCase<'a> {
    state: &'a mut SessionState,
}

impl<'a> CompleteSendUseCase<'a> {
    /// 新しい CompleteSendUseCase を作成
    pub fn new(state: &'a mut SessionState) -> Self {
        Self { state }
    }

    /// 送信完了を反映
    ///
    /// # Arguments
    ///
    /// * `kind` - 完了した送信の種類
    /// * `delivered` - トランスポートが書き込みに成功したか
    ///
    /// # Returns
    ///
    /// * `Some(bool)` - 送信可否が変わった（新しい値）
    /// * `None` - 変化なし
    pub fn execute(self, kind: SendKind, delivered: bool) -> Option<bool> {
        let gate = &mut self.state.gate;
        match (kind, delivered) {
            (SendKind::DirectoryRequest, true) => gate.open().then_some(true),
            (SendKind::Chat, true) => {
                gate.release();
                None
            }
            // 失敗した送信の後は接続が閉じるので、ゲートも閉じる
            (_, false) => gate.shut().then_some(false),
        }
    }
}
