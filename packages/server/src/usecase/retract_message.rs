//! UseCase: メッセージ取り消し処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RetractMessageUseCase::execute() メソッド
//! - 投稿者本人が期限内に一度だけ取り消せること
//!
//! ### どのような状況を想定しているか
//! - 正常系：期限内の取り消し
//! - 異常系：他人のメッセージ、期限切れ、二重取り消し、存在しない ID

use super::{context::RoomContext, error::RetractMessageError};
use crate::{
    domain::{MessageId, SessionId},
    infrastructure::dto::websocket::ServerFrame,
};

/// メッセージ取り消しのユースケース
pub struct RetractMessageUseCase<'a> {
    ctx: &'a mut RoomContext,
}

impl<'a> RetractMessageUseCase<'a> {
    pub fn new(ctx: &'a mut RoomContext) -> Self {
        Self { ctx }
    }

    /// メッセージを取り消す
    ///
    /// # Arguments
    ///
    /// * `session_id` - 取り消しを要求したセッション
    /// * `message_id` - 対象メッセージの ID（クライアントから受け取った文字列）
    ///
    /// # Returns
    ///
    /// * `Ok(MessageId)` - 取り消したメッセージの ID
    /// * `Err(RetractMessageError)` - 取り消し失敗（状態は変更されない）
    pub async fn execute(
        &mut self,
        session_id: SessionId,
        message_id: String,
    ) -> Result<MessageId, RetractMessageError> {
        let now = self.ctx.now_timestamp();
        let window_ms = self.ctx.policy.retract_window_ms;

        let session = self
            .ctx
            .sessions
            .get(&session_id)
            .ok_or(RetractMessageError::UnknownSession)?;
        let requester = session
            .identity()
            .map(|identity| identity.id.clone())
            .ok_or(RetractMessageError::NotIdentified)?;
        let message_id = MessageId::new(message_id).map_err(|_| RetractMessageError::NotFound)?;

        // 1. 取り消し後のトランスクリプトを作る
        let mut next = self.ctx.state.transcript().await?.clone();
        let message = next
            .find_mut(&message_id)
            .ok_or(RetractMessageError::NotFound)?;
        message.retract(&requester, now, window_ms)?;

        // 2. 永続化してから配信
        self.ctx
            .state
            .replace_transcript(next)
            .await
            .inspect_err(|e| tracing::error!("Failed to persist retraction: {}", e))?;
        tracing::info!(message_id = %message_id, requester = %requester, "Message retracted");

        self.ctx.sessions.broadcast(
            &ServerFrame::Retract {
                message_id: message_id.to_string(),
            },
            None,
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RETRACTED_PLACEHOLDER,
        infrastructure::store::MESSAGES_KEY,
        usecase::test_support::{TestClient, TestRoom, frame_types},
    };

    async fn post(room: &TestRoom, client: &TestClient, text: &str) -> String {
        room.chat(client, text).await;
        let mut ctx = room.room.lock().await;
        let transcript = ctx.state.transcript().await.unwrap();
        transcript.iter().last().unwrap().message_id.to_string()
    }

    async fn retract(
        room: &TestRoom,
        client: &TestClient,
        message_id: &str,
    ) -> Result<MessageId, RetractMessageError> {
        let mut ctx = room.room.lock().await;
        RetractMessageUseCase::new(&mut ctx)
            .execute(client.session_id, message_id.to_string())
            .await
    }

    #[tokio::test]
    async fn test_retract_within_window_succeeds() {
        // テスト項目: 投稿者は 119 秒後でも取り消せて、全員に retract が届く
        // given (前提条件):
        let room = TestRoom::new();
        let mut alice = room.join("u-1", "alice").await;
        let mut bob = room.join("u-2", "bob").await;
        let message_id = post(&room, &alice, "oops").await;
        alice.frames();
        bob.frames();
        room.advance_millis(119_000);

        // when (操作):
        let result = retract(&room, &alice, &message_id).await;

        // then (期待する結果):
        assert!(result.is_ok());
        for frames in [alice.frames(), bob.frames()] {
            assert_eq!(frame_types(&frames), vec!["retract"]);
            assert_eq!(frames[0]["messageId"], message_id.as_str());
        }
        let stored = room.stored(MESSAGES_KEY).await.unwrap();
        assert_eq!(stored[0]["isRetracted"], true);
        assert_eq!(stored[0]["text"], RETRACTED_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_retract_after_window_fails() {
        // テスト項目: 121 秒後の取り消しは拒否され、メッセージは変わらない
        // given (前提条件):
        let room = TestRoom::new();
        let alice = room.join("u-1", "alice").await;
        let message_id = post(&room, &alice, "too late").await;
        room.advance_millis(121_000);

        // when (操作):
        let result = retract(&room, &alice, &message_id).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(RetractMessageError::WindowExpired { window_ms: 120_000 })
        ));
        let stored = room.stored(MESSAGES_KEY).await.unwrap();
        assert_eq!(stored[0]["isRetracted"], false);
        assert_eq!(stored[0]["text"], "too late");
    }

    #[tokio::test]
    async fn test_retract_by_other_identity_fails() {
        // テスト項目: 他の identity のメッセージは期限内でも取り消せない
        // given (前提条件):
        let room = TestRoom::new();
        let alice = room.join("u-1", "alice").await;
        let bob = room.join("u-2", "bob").await;
        let message_id = post(&room, &alice, "mine").await;

        // when (操作):
        let result = retract(&room, &bob, &message_id).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RetractMessageError::NotAuthor)));
    }

    #[tokio::test]
    async fn test_retract_twice_fails() {
        // テスト項目: 取り消し済みのメッセージは再度取り消せない
        let room = TestRoom::new();
        let alice = room.join("u-1", "alice").await;
        let message_id = post(&room, &alice, "once").await;
        retract(&room, &alice, &message_id).await.unwrap();

        let result = retract(&room, &alice, &message_id).await;

        assert!(matches!(result, Err(RetractMessageError::AlreadyRetracted)));
    }

    #[tokio::test]
    async fn test_retract_unknown_message_fails() {
        // テスト項目: 存在しない ID や空の ID は NotFound
        let room = TestRoom::new();
        let alice = room.join("u-1", "alice").await;

        assert!(matches!(
            retract(&room, &alice, "no-such-id").await,
            Err(RetractMessageError::NotFound)
        ));
        assert!(matches!(
            retract(&room, &alice, "").await,
            Err(RetractMessageError::NotFound)
        ));
    }
}
