//! InMemory key-value store.
//!
//! HashMap をインメモリ DB として使用します。プロセス終了で内容は失われます。

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::domain::RepositoryError;

/// インメモリ key-value store
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn transaction(&self, writes: Vec<(String, Value)>) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().await;
        entries.extend(writes);
        Ok(())
    }
}
