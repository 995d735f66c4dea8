//! UseCase: 切断処理
//!
//! セッションをレジストリから削除し、認証済みだった場合は退出を通知します。
//! ブロードキャストの送信失敗で既に削除されたセッションは通知しません。

use super::{context::RoomContext, status::RoomStatusUseCase};
use crate::{
    domain::{Identity, SessionId},
    infrastructure::dto::websocket::ServerFrame,
};

/// 切断のユースケース
pub struct DisconnectSessionUseCase<'a> {
    ctx: &'a mut RoomContext,
}

impl<'a> DisconnectSessionUseCase<'a> {
    pub fn new(ctx: &'a mut RoomContext) -> Self {
        Self { ctx }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 退出を通知した場合はそのセッションの identity
    pub async fn execute(&mut self, session_id: SessionId) -> Option<Identity> {
        let Some(mut session) = self.ctx.sessions.remove(&session_id) else {
            tracing::debug!(session_id = %session_id, "Session already purged");
            return None;
        };
        session.terminate();
        tracing::info!(
            session_id = %session_id,
            sessions = self.ctx.sessions.len(),
            "Session closed"
        );

        let identity = session.identity().cloned()?;
        self.ctx
            .sessions
            .broadcast(&ServerFrame::info(format!("{} left.", identity.name)), None);
        RoomStatusUseCase::new(self.ctx).broadcast().await;
        Some(identity)
    }
}
