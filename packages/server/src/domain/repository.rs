//! Repository trait for the durable room state.
//!
//! The use case layer depends on this trait; implementations live in the
//! infrastructure layer.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    entity::{ChatMessage, DailyQuota},
    error::RepositoryError,
};

/// Durable transcript and daily write counter of the room
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStateRepository: Send + Sync {
    /// Stored transcript, oldest first. Empty if nothing was stored yet.
    async fn load_messages(&self) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Stored quota. A missing date reads as `today`, a missing counter as 0.
    async fn load_quota(&self, today: NaiveDate) -> Result<DailyQuota, RepositoryError>;

    /// Persist quota date and counter together.
    async fn save_quota(&self, quota: DailyQuota) -> Result<(), RepositoryError>;

    /// Persist the transcript alone (retraction).
    async fn save_messages(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError>;

    /// Persist the transcript, the quota date and the daily counter in one
    /// transaction.
    async fn commit_message(
        &self,
        messages: Vec<ChatMessage>,
        quota: DailyQuota,
    ) -> Result<(), RepositoryError>;
}
