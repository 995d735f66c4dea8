//! Live session model.

use super::{
    entity::Identity,
    error::ConnectionClosed,
    value_object::{SessionId, Timestamp},
};

/// Outbound half of a client connection.
///
/// Sending never blocks; it fails once the remote end is gone.
pub trait Connection: Send + Sync {
    fn send_text(&self, text: &str) -> Result<(), ConnectionClosed>;
}

/// Server-side record of one live connection
pub struct Session {
    id: SessionId,
    connection: Box<dyn Connection>,
    identity: Option<Identity>,
    last_sent_at: Option<Timestamp>,
    connected_at: Timestamp,
    terminated: bool,
}

impl Session {
    /// Create an unidentified session for a freshly accepted connection
    pub fn new(id: SessionId, connection: Box<dyn Connection>, connected_at: Timestamp) -> Self {
        Self {
            id,
            connection,
            identity: None,
            last_sent_at: None,
            connected_at,
            terminated: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_identified(&self) -> bool {
        self.identity.is_some()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    /// Bind the session to an identity.
    ///
    /// Only the first call has an effect; returns whether it did.
    pub fn identify(&mut self, identity: Identity) -> bool {
        if self.identity.is_some() {
            return false;
        }
        self.identity = Some(identity);
        true
    }

    /// Rate check for a chat attempt at `now`.
    ///
    /// Accepts and records `now` when at least `min_interval_ms` has passed
    /// since the last accepted attempt; otherwise leaves the state untouched.
    pub fn try_record_send(&mut self, now: Timestamp, min_interval_ms: i64) -> bool {
        if let Some(last) = self.last_sent_at
            && now.millis_since(last) < min_interval_ms
        {
            return false;
        }
        self.last_sent_at = Some(now);
        true
    }

    /// Send a text frame. A failed send terminates the session.
    pub fn send(&mut self, text: &str) -> bool {
        if self.terminated {
            return false;
        }
        match self.connection.send_text(text) {
            Ok(()) => true,
            Err(ConnectionClosed) => {
                tracing::debug!(session_id = %self.id, "send failed, terminating session");
                self.terminated = true;
                false
            }
        }
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("last_sent_at", &self.last_sent_at)
            .field("connected_at", &self.connected_at)
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}
