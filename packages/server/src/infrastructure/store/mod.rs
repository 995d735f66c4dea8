//! Durable key-value store scoped to the room.
//!
//! Holds three keys: the transcript, the last quota reset date and the daily
//! write counter. Multi-key writes go through `transaction`, which commits
//! all writes or none.

pub mod inmemory;
pub mod json_file;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::RepositoryError;

pub use inmemory::InMemoryStore;
pub use json_file::JsonFileStore;

/// Key of the stored transcript (array of messages)
pub const MESSAGES_KEY: &str = "messages";
/// Key of the date the daily counter was last reset (`YYYY-MM-DD`)
pub const LAST_WRITE_DATE_KEY: &str = "lastWriteDate";
/// Key of the daily write counter
pub const DAILY_WRITES_KEY: &str = "dailyWrites";

/// Key-value storage with atomic multi-key writes
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError>;

    async fn put(&self, key: &str, value: Value) -> Result<(), RepositoryError>;

    /// Apply all writes together, or none of them.
    async fn transaction(&self, writes: Vec<(String, Value)>) -> Result<(), RepositoryError>;
}
