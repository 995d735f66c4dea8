//! UseCase: 接続受け入れ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - 新しい接続を未認証セッションとして登録し、履歴とステータスを送る
//!
//! ### どのような状況を想定しているか
//! - 正常系：履歴が空 / 履歴がある
//! - 異常系：履歴の読み込みに失敗しても接続は維持される

use super::{context::RoomContext, error::INTERNAL_ERROR_MESSAGE, status::RoomStatusUseCase};
use crate::{
    domain::{Connection, SessionId},
    infrastructure::dto::websocket::ServerFrame,
};

/// 接続受け入れのユースケース
pub struct ConnectSessionUseCase<'a> {
    ctx: &'a mut RoomContext,
}

impl<'a> ConnectSessionUseCase<'a> {
    pub fn new(ctx: &'a mut RoomContext) -> Self {
        Self { ctx }
    }

    /// 接続を登録し、履歴を送信してステータスを配信する
    ///
    /// # Arguments
    ///
    /// * `connection` - 新しい接続の送信側
    ///
    /// # Returns
    ///
    /// 登録されたセッションの ID
    pub async fn execute(&mut self, connection: Box<dyn Connection>) -> SessionId {
        let connected_at = self.ctx.now_timestamp();
        let session_id = self.ctx.sessions.register(connection, connected_at);
        tracing::info!(
            session_id = %session_id,
            sessions = self.ctx.sessions.len(),
            "Session accepted"
        );

        // 1. 履歴を送信
        let history = match self.ctx.state.transcript().await {
            Ok(transcript) => ServerFrame::History {
                messages: transcript.to_vec(),
            },
            Err(e) => {
                tracing::error!(session_id = %session_id, "Failed to load transcript: {}", e);
                ServerFrame::error(INTERNAL_ERROR_MESSAGE)
            }
        };
        self.ctx.sessions.send_to(&session_id, &history);

        // 2. ステータスを配信（この時点ではまだ online に数えられない）
        RoomStatusUseCase::new(self.ctx).broadcast().await;

        session_id
    }
}
