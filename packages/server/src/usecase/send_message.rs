//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - レート制限、日次クォータ、トランスクリプトへの追加とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 永続化が成功した場合のみキャッシュとクライアントに反映されることを保証
//! - 日付が変わった時点でクォータがリセットされることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：未認証、レート制限、クォータ切れ、保存失敗

use super::{context::RoomContext, error::SendMessageError, status::RoomStatusUseCase};
use crate::{
    domain::{ChatMessage, MessageIdFactory, SessionId, Timestamp},
    infrastructure::dto::websocket::ServerFrame,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase<'a> {
    ctx: &'a mut RoomContext,
}

impl<'a> SendMessageUseCase<'a> {
    pub fn new(ctx: &'a mut RoomContext) -> Self {
        Self { ctx }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 送信者のセッション
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 保存・配信されたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗（状態は変更されない）
    pub async fn execute(
        &mut self,
        session_id: SessionId,
        text: String,
    ) -> Result<ChatMessage, SendMessageError> {
        let now = self.ctx.now();
        let timestamp = Timestamp::from(now);
        let min_interval_ms = self.ctx.policy.min_send_interval_ms;

        // 1. 認証とレート制限
        let session = self
            .ctx
            .sessions
            .get_mut(&session_id)
            .ok_or(SendMessageError::UnknownSession)?;
        let author = session
            .identity()
            .cloned()
            .ok_or(SendMessageError::NotIdentified)?;
        if !session.try_record_send(timestamp, min_interval_ms) {
            return Err(SendMessageError::RateLimited);
        }

        // 2. 日次クォータ（日付が変わっていればリセットを永続化）
        let quota = self
            .ctx
            .state
            .roll_over_quota(now.date_naive())
            .await
            .inspect_err(|e| tracing::error!("Failed to roll over daily quota: {}", e))?;
        if quota.is_exhausted(self.ctx.policy.daily_write_limit) {
            return Err(SendMessageError::QuotaExhausted);
        }

        // 3. トランスクリプトに追加して永続化
        let message = ChatMessage::new(MessageIdFactory::generate(), &author, text, timestamp);
        let evicted = self
            .ctx
            .state
            .append_message(message.clone(), quota)
            .await
            .inspect_err(|e| tracing::error!("Failed to commit message: {}", e))?;
        tracing::debug!(
            message_id = %message.message_id,
            author = %author.id,
            evicted,
            "Message committed"
        );

        // 4. 配信
        self.ctx
            .sessions
            .broadcast(&ServerFrame::Message(message.clone()), None);
        RoomStatusUseCase::new(self.ctx).broadcast().await;

        Ok(message)
    }
}
