//! The room actor.
//!
//! `ChatRoom` owns the `RoomContext` behind one exclusive lock. Every inbound
//! event (accept, frame, close, status query) takes the lock for its whole
//! duration, storage awaits included, so events are applied one at a time in
//! arrival order.

use hiroba_shared::time::timestamp_to_rfc3339;
use tokio::sync::{Mutex, MutexGuard};

use super::{
    connect_session::ConnectSessionUseCase,
    context::RoomContext,
    disconnect_session::DisconnectSessionUseCase,
    identify::{IdentifyUseCase, IdentityRequest},
    retract_message::RetractMessageUseCase,
    send_message::SendMessageUseCase,
    status::{RoomStatus, RoomStatusUseCase},
    typing::TypingUseCase,
};
use crate::{
    domain::{Connection, RepositoryError, SessionId},
    infrastructure::dto::{
        http::{RoomSnapshotDto, SessionDto},
        websocket::{ClientFrame, ServerFrame},
    },
};

/// Name of the singleton room every connection joins
pub const GLOBAL_ROOM_NAME: &str = "global-chat-room";

pub struct ChatRoom {
    name: String,
    context: Mutex<RoomContext>,
}

impl ChatRoom {
    pub fn new(name: impl Into<String>, context: RoomContext) -> Self {
        Self {
            name: name.into(),
            context: Mutex::new(context),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, RoomContext> {
        self.context.lock().await
    }

    /// Register a new connection as an unidentified session
    pub async fn accept(&self, connection: Box<dyn Connection>) -> SessionId {
        let mut ctx = self.context.lock().await;
        ConnectSessionUseCase::new(&mut ctx).execute(connection).await
    }

    /// Apply one client frame. Failures are answered with an `error` frame
    /// to the sender only.
    pub async fn handle_frame(&self, session_id: SessionId, frame: ClientFrame) {
        let mut ctx = self.context.lock().await;
        let kind = frame.kind();
        tracing::debug!(session_id = %session_id, frame = kind, "Frame received");

        let result = match frame {
            ClientFrame::Identity { id, name, avatar } => IdentifyUseCase::new(&mut ctx)
                .execute(session_id, IdentityRequest { id, name, avatar })
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            ClientFrame::Chat { text } => SendMessageUseCase::new(&mut ctx)
                .execute(session_id, text)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            ClientFrame::Typing => TypingUseCase::new(&mut ctx)
                .execute(session_id)
                .map(|_| ())
                .map_err(|e| e.to_string()),
            ClientFrame::Retract { message_id } => RetractMessageUseCase::new(&mut ctx)
                .execute(session_id, message_id)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
        };

        if let Err(message) = result {
            tracing::warn!(session_id = %session_id, frame = kind, "Rejected: {}", message);
            ctx.sessions
                .send_to(&session_id, &ServerFrame::error(message));
        }
    }

    /// Forget a closed connection
    pub async fn close(&self, session_id: SessionId) {
        let mut ctx = self.context.lock().await;
        DisconnectSessionUseCase::new(&mut ctx)
            .execute(session_id)
            .await;
    }

    pub async fn status(&self) -> Result<RoomStatus, RepositoryError> {
        let mut ctx = self.context.lock().await;
        RoomStatusUseCase::new(&mut ctx).compute().await
    }

    /// Read-only overview for the HTTP API
    pub async fn snapshot(&self) -> Result<RoomSnapshotDto, RepositoryError> {
        let mut ctx = self.context.lock().await;
        let status = RoomStatusUseCase::new(&mut ctx).compute().await?;
        let messages = ctx.state.transcript().await?.len();

        let mut sessions: Vec<SessionDto> = ctx
            .sessions
            .iter()
            .filter(|s| !s.is_terminated())
            .map(|s| SessionDto {
                session_id: s.id().to_string(),
                id: s.identity().map(|i| i.id.to_string()),
                name: s.identity().map(|i| i.name.clone()),
                connected_at: timestamp_to_rfc3339(s.connected_at().value()),
            })
            .collect();
        sessions.sort_by(|a, b| a.connected_at.cmp(&b.connected_at));

        Ok(RoomSnapshotDto {
            name: self.name.clone(),
            online: status.online,
            remaining: status.remaining,
            messages,
            sessions,
        })
    }
}
