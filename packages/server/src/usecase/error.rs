//! UseCase 層のエラー定義
//!
//! `Display` の文言はそのまま `error` フレームとしてクライアントに返されます。

use thiserror::Error;

use crate::domain::{RepositoryError, RetractError, ValueObjectError};

/// Reply text for failures that are not the client's fault
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong on the server. Please try again.";

#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("Unknown session")]
    UnknownSession,

    #[error("Invalid identity: {0}")]
    InvalidId(#[from] ValueObjectError),
}

#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("Unknown session")]
    UnknownSession,

    #[error("Please set your identity before sending messages.")]
    NotIdentified,

    #[error("You are sending messages too fast.")]
    RateLimited,

    #[error("Today's message quota is used up. Come back tomorrow!")]
    QuotaExhausted,

    #[error("Failed to save your message. Please try again.")]
    Storage(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum TypingError {
    #[error("Unknown session")]
    UnknownSession,

    #[error("Please set your identity first.")]
    NotIdentified,
}

#[derive(Debug, Error)]
pub enum RetractMessageError {
    #[error("Unknown session")]
    UnknownSession,

    #[error("Please set your identity first.")]
    NotIdentified,

    #[error("Message not found.")]
    NotFound,

    #[error("You can only retract your own messages.")]
    NotAuthor,

    #[error("This message has already been retracted.")]
    AlreadyRetracted,

    #[error("Messages can only be retracted within {} seconds.", .window_ms / 1000)]
    WindowExpired { window_ms: i64 },

    #[error("Failed to retract the message. Please try again.")]
    Storage(#[from] RepositoryError),
}

impl From<RetractError> for RetractMessageError {
    fn from(value: RetractError) -> Self {
        match value {
            RetractError::NotAuthor => Self::NotAuthor,
            RetractError::AlreadyRetracted => Self::AlreadyRetracted,
            RetractError::WindowExpired { window_ms, .. } => Self::WindowExpired { window_ms },
        }
    }
}
