//! HTTP API response DTOs for the chat room.

use serde::{Deserialize, Serialize};

/// Room overview for the `/api/room` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshotDto {
    pub name: String,
    pub online: usize,
    pub remaining: u64,
    /// Number of messages in the transcript
    pub messages: usize,
    pub sessions: Vec<SessionDto>,
}

/// One live connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub session_id: String,
    /// Identity id, absent until the handshake completes
    pub id: Option<String>,
    pub name: Option<String>,
    pub connected_at: String, // ISO 8601
}
