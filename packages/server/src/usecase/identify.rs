//! UseCase: アイデンティティ・ハンドシェイク処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - IdentifyUseCase::execute() メソッド
//! - セッションに identity を一度だけ設定し、welcome / identity / join を送る
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前とアバター指定あり / 省略時のフォールバック
//! - 準正常系：同じセッションからの再送は identity の再送のみ
//! - 異常系：空の ID / 長すぎる ID

use super::{context::RoomContext, error::IdentifyError, status::RoomStatusUseCase};
use crate::{
    domain::{DEFAULT_AVATAR, DisplayNameFactory, Identity, IdentityId, SessionId},
    infrastructure::dto::websocket::ServerFrame,
};

/// Identity fields as sent by the client
#[derive(Debug, Clone, Default)]
pub struct IdentityRequest {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Whether the handshake bound a new identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifyOutcome {
    Joined(Identity),
    AlreadyIdentified(Identity),
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn identity_frame(identity: &Identity) -> ServerFrame {
    ServerFrame::Identity {
        id: identity.id.to_string(),
        name: identity.name.clone(),
        avatar: identity.avatar.clone(),
    }
}

/// ハンドシェイクのユースケース
pub struct IdentifyUseCase<'a> {
    ctx: &'a mut RoomContext,
}

impl<'a> IdentifyUseCase<'a> {
    pub fn new(ctx: &'a mut RoomContext) -> Self {
        Self { ctx }
    }

    /// セッションに identity を設定する
    ///
    /// # Arguments
    ///
    /// * `session_id` - 対象セッション
    /// * `request` - クライアントが送った id / name / avatar
    ///
    /// # Returns
    ///
    /// * `Ok(IdentifyOutcome)` - 新規参加、または既に設定済み
    /// * `Err(IdentifyError)` - 不明なセッション、または不正な ID
    pub async fn execute(
        &mut self,
        session_id: SessionId,
        request: IdentityRequest,
    ) -> Result<IdentifyOutcome, IdentifyError> {
        let session = self
            .ctx
            .sessions
            .get(&session_id)
            .ok_or(IdentifyError::UnknownSession)?;

        // 1. 既に設定済みなら identity を再送するだけ
        if let Some(identity) = session.identity().cloned() {
            tracing::debug!(session_id = %session_id, "Repeated identity frame");
            self.ctx
                .sessions
                .send_to(&session_id, &identity_frame(&identity));
            return Ok(IdentifyOutcome::AlreadyIdentified(identity));
        }

        // 2. identity を解決
        let id = IdentityId::new(request.id)?;
        let name = match non_blank(request.name) {
            Some(name) => name,
            None => DisplayNameFactory::generate(&mut self.ctx.rng),
        };
        let avatar = non_blank(request.avatar).unwrap_or_else(|| DEFAULT_AVATAR.to_string());
        let identity = Identity::new(id, name, avatar);

        if let Some(session) = self.ctx.sessions.get_mut(&session_id) {
            session.identify(identity.clone());
        }
        tracing::info!(
            session_id = %session_id,
            identity_id = %identity.id,
            name = %identity.name,
            "Session identified"
        );

        // 3. 本人に welcome と identity を送信
        self.ctx.sessions.send_to(
            &session_id,
            &ServerFrame::info(format!("Welcome, {}!", identity.name)),
        );
        self.ctx
            .sessions
            .send_to(&session_id, &identity_frame(&identity));

        // 4. 参加を通知してステータスを配信
        self.ctx.sessions.broadcast(
            &ServerFrame::info(format!("{} joined the chat.", identity.name)),
            None,
        );
        RoomStatusUseCase::new(self.ctx).broadcast().await;

        Ok(IdentifyOutcome::Joined(identity))
    }
}
