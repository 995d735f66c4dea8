//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// IdentityId validation error
    #[error("IdentityId cannot be empty")]
    IdentityIdEmpty,

    /// IdentityId too long error
    #[error("IdentityId cannot exceed {max} bytes (got {actual})")]
    IdentityIdTooLong { max: usize, actual: usize },

    /// MessageId validation error
    #[error("MessageId cannot be empty")]
    MessageIdEmpty,
}

/// Reasons a message cannot be retracted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetractError {
    #[error("only the author may retract a message")]
    NotAuthor,

    #[error("message is already retracted")]
    AlreadyRetracted,

    #[error("retract window of {window_ms} ms has passed ({elapsed_ms} ms elapsed)")]
    WindowExpired { window_ms: i64, elapsed_ms: i64 },
}

/// A send on a connection whose remote end is gone
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("connection closed")]
pub struct ConnectionClosed;

/// Errors raised by the durable room state store
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value for key '{key}' is malformed: {reason}")]
    Malformed { key: String, reason: String },

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
