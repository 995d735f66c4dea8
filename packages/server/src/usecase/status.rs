//! UseCase: ルームステータスの計算と配信
//!
//! online（認証済みで生きているセッション数）と remaining（今日の残り書き込み数）を
//! 計算し、未認証を含む全セッションに配信します。

use super::context::RoomContext;
use crate::{domain::RepositoryError, infrastructure::dto::websocket::ServerFrame};

/// Room status as reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomStatus {
    pub online: usize,
    pub remaining: u64,
}

impl From<RoomStatus> for ServerFrame {
    fn from(status: RoomStatus) -> Self {
        ServerFrame::Status {
            online: status.online,
            remaining: status.remaining,
        }
    }
}

/// ステータス計算のユースケース
pub struct RoomStatusUseCase<'a> {
    ctx: &'a mut RoomContext,
}

impl<'a> RoomStatusUseCase<'a> {
    pub fn new(ctx: &'a mut RoomContext) -> Self {
        Self { ctx }
    }

    /// ステータスを計算する（日付が変わっていれば remaining はリセット後の値）
    pub async fn compute(&mut self) -> Result<RoomStatus, RepositoryError> {
        let today = self.ctx.now().date_naive();
        let quota = self.ctx.state.quota_view(today).await?;
        Ok(RoomStatus {
            online: self.ctx.sessions.online_count(),
            remaining: quota.remaining(self.ctx.policy.daily_write_limit),
        })
    }

    /// ステータスを計算して全セッションに配信する
    ///
    /// # Returns
    ///
    /// * `Some(RoomStatus)` - 配信したステータス
    /// * `None` - ストレージ読み込みに失敗し、配信しなかった
    pub async fn broadcast(&mut self) -> Option<RoomStatus> {
        match self.compute().await {
            Ok(status) => {
                self.ctx.sessions.broadcast(&ServerFrame::from(status), None);
                Some(status)
            }
            Err(e) => {
                tracing::error!("Failed to compute room status: {}", e);
                None
            }
        }
    }
}
