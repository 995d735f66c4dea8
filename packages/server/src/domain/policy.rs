//! Room limits.

use super::entity::{DEFAULT_DAILY_WRITE_LIMIT, DEFAULT_TRANSCRIPT_CAPACITY};

/// Minimum gap between two accepted chat messages of one session
pub const DEFAULT_MIN_SEND_INTERVAL_MS: i64 = 500;

/// How long after creation the author may retract a message
pub const DEFAULT_RETRACT_WINDOW_MS: i64 = 120_000;

/// Rate, quota and retention limits applied by the room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPolicy {
    /// Maximum number of messages kept in the transcript
    pub transcript_capacity: usize,
    /// Chat messages accepted per UTC day across the whole room
    pub daily_write_limit: u64,
    /// Per-session minimum interval between chat messages
    pub min_send_interval_ms: i64,
    /// Retraction window measured from the message timestamp
    pub retract_window_ms: i64,
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            transcript_capacity: DEFAULT_TRANSCRIPT_CAPACITY,
            daily_write_limit: DEFAULT_DAILY_WRITE_LIMIT,
            min_send_interval_ms: DEFAULT_MIN_SEND_INTERVAL_MS,
            retract_window_ms: DEFAULT_RETRACT_WINDOW_MS,
        }
    }
}
