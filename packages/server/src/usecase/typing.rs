//! UseCase: 入力中通知
//!
//! 送信者と同じ identity を持つセッションを除く、認証済みの全セッションに
//! `typing` を配信します。永続化はしません。

use super::{context::RoomContext, error::TypingError};
use crate::{domain::SessionId, infrastructure::dto::websocket::ServerFrame};

pub struct TypingUseCase<'a> {
    ctx: &'a mut RoomContext,
}

impl<'a> TypingUseCase<'a> {
    pub fn new(ctx: &'a mut RoomContext) -> Self {
        Self { ctx }
    }

    /// Returns the number of sessions notified
    pub fn execute(&mut self, session_id: SessionId) -> Result<usize, TypingError> {
        let session = self
            .ctx
            .sessions
            .get(&session_id)
            .ok_or(TypingError::UnknownSession)?;
        let identity = session
            .identity()
            .cloned()
            .ok_or(TypingError::NotIdentified)?;

        let frame = ServerFrame::Typing {
            name: identity.name,
            id: identity.id.to_string(),
        };
        Ok(self.ctx.sessions.broadcast(&frame, Some(&identity.id)))
    }
}
