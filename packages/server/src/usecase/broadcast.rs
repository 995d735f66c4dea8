//! Session registry and broadcast engine.
//!
//! Fan-out doubles as registry cleanup: a failed send terminates the
//! session and terminated sessions are purged after each broadcast pass.

use std::collections::HashMap;

use crate::{
    domain::{Connection, IdentityId, Session, SessionId, SessionIdFactory, Timestamp},
    infrastructure::dto::websocket::ServerFrame,
};

/// Live sessions keyed by connection
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
}

fn encode(frame: &ServerFrame) -> Option<String> {
    match serde_json::to_string(frame) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize frame: {}", e);
            None
        }
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new unidentified session for `connection`
    pub fn register(&mut self, connection: Box<dyn Connection>, connected_at: Timestamp) -> SessionId {
        let id = SessionIdFactory::generate();
        self.sessions
            .insert(id, Session::new(id, connection, connected_at));
        id
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Identified sessions that are still alive
    pub fn online_count(&self) -> usize {
        self.sessions
            .values()
            .filter(|s| s.is_identified() && !s.is_terminated())
            .count()
    }

    /// Send a frame to one session. A failed send terminates it.
    pub fn send_to(&mut self, id: &SessionId, frame: &ServerFrame) -> bool {
        let Some(session) = self.sessions.get_mut(id) else {
            return false;
        };
        let Some(json) = encode(frame) else {
            return false;
        };
        session.send(&json)
    }

    /// Send a frame to every eligible session.
    ///
    /// Skipped but kept: sessions whose identity is `exclude`, and
    /// unidentified sessions unless the frame is a status update.
    /// Returns the number of sessions the frame was delivered to.
    pub fn broadcast(&mut self, frame: &ServerFrame, exclude: Option<&IdentityId>) -> usize {
        let Some(json) = encode(frame) else {
            return 0;
        };
        let to_everyone = frame.is_status();

        let mut delivered = 0;
        for session in self.sessions.values_mut() {
            let excluded = match (exclude, session.identity()) {
                (Some(excluded_id), Some(identity)) => &identity.id == excluded_id,
                _ => false,
            };
            if excluded || (!to_everyone && !session.is_identified()) {
                continue;
            }
            if session.send(&json) {
                delivered += 1;
            }
        }

        self.purge_terminated();
        delivered
    }

    fn purge_terminated(&mut self) {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_terminated());
        let purged = before - self.sessions.len();
        if purged > 0 {
            tracing::info!(purged, remaining = self.sessions.len(), "purged dead sessions");
        }
    }
}
