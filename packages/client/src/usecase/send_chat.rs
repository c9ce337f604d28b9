//! UseCase: チャット送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatUseCase::execute() メソッド
//! - 本文の検証、フレームの生成、送信ゲートの確保
//!
//! ### なぜこのテストが必要か
//! - 送信は同時に 1 件だけ（2 件目は拒否され、キューに積まれない）
//! - ローカルエコーに使う名前がディレクトリから解決されることを確認
//! - 拒否されたときにゲートの状態が変わらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信可能な状態での送信
//! - 異常系：送信中・未接続・切断後の送信、空の本文、大きすぎるフレーム

use hanashi_shared::protocol::MAX_FRAME_BYTES;

use crate::{
    domain::{ChatText, DisplayName, SessionState},
    infrastructure::codec,
};

use super::error::SendChatError;

/// 送信が受け付けられたチャット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundChat {
    /// 送信するフレーム（JSON テキスト）
    pub frame: String,
    /// ローカルエコーに表示する名前
    pub echo_name: DisplayName,
    /// 本文
    pub text: ChatText,
}

/// チャット送信のユースケース
pub struct SendChatUseCase<'a> {
    state: &'a mut SessionState,
}

impl<'a> SendChatUseCase<'a> {
    /// 新しい SendChatUseCase を作成
    pub fn new(state: &'a mut SessionState) -> Self {
        Self { state }
    }

    /// チャット送信を実行
    ///
    /// 成功するとゲートは InFlight になり、送信完了まで次の送信は拒否される。
    ///
    /// # Arguments
    ///
    /// * `text` - 入力された本文
    ///
    /// # Returns
    ///
    /// * `Ok(OutboundChat)` - 送信するフレームとローカルエコーの内容
    /// * `Err(SendChatError)` - 拒否（ゲートの状態は変わらない）
    pub fn execute(self, text: String) -> Result<OutboundChat, SendChatError> {
        let text = ChatText::new(text)?;

        let frame = codec::encode_chat(self.state.local_id(), &text)
            .map_err(|e| SendChatError::Encode(e.to_string()))?;
        if frame.len() > MAX_FRAME_BYTES {
            return Err(SendChatError::FrameTooLarge {
                max: MAX_FRAME_BYTES,
                actual: frame.len(),
            });
        }

        // 1. 送信ゲートを確保（送信中・未接続なら拒否）
        self.state.gate.try_acquire()?;

        // 2. ローカルエコー用の名前（ディレクトリ未着なら仮名）
        let echo_name = self.state.identity.echo_name();

        Ok(OutboundChat {
            frame,
            echo_name,
            text,
        })
    }
}
