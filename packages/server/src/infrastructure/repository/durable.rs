//! RoomStateRepository backed by a key-value store.
//!
//! Maps the room state onto the `messages`, `lastWriteDate` and
//! `dailyWrites` keys.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use hiroba_shared::time::{date_key, parse_date_key};
use serde_json::Value;

use crate::{
    domain::{ChatMessage, DailyQuota, RepositoryError, RoomStateRepository},
    infrastructure::store::{DAILY_WRITES_KEY, KeyValueStore, LAST_WRITE_DATE_KEY, MESSAGES_KEY},
};

pub struct DurableRoomStateRepository {
    store: Arc<dyn KeyValueStore>,
}

impl DurableRoomStateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

fn encode_messages(messages: &[ChatMessage]) -> Result<Value, RepositoryError> {
    serde_json::to_value(messages).map_err(|e| RepositoryError::Encode {
        key: MESSAGES_KEY.to_string(),
        source: e,
    })
}

fn malformed(key: &str, reason: impl ToString) -> RepositoryError {
    RepositoryError::Malformed {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl RoomStateRepository for DurableRoomStateRepository {
    async fn load_messages(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        match self.store.get(MESSAGES_KEY).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| malformed(MESSAGES_KEY, e))
            }
        }
    }

    async fn load_quota(&self, today: NaiveDate) -> Result<DailyQuota, RepositoryError> {
        let date = match self.store.get(LAST_WRITE_DATE_KEY).await? {
            None | Some(Value::Null) => today,
            Some(Value::String(key)) => parse_date_key(&key)
                .ok_or_else(|| malformed(LAST_WRITE_DATE_KEY, format!("not a date: {key}")))?,
            Some(other) => return Err(malformed(LAST_WRITE_DATE_KEY, format!("not a string: {other}"))),
        };
        let writes = match self.store.get(DAILY_WRITES_KEY).await? {
            None | Some(Value::Null) => 0,
            Some(value) => value
                .as_u64()
                .ok_or_else(|| malformed(DAILY_WRITES_KEY, format!("not a counter: {value}")))?,
        };
        Ok(DailyQuota::new(date, writes))
    }

    async fn save_quota(&self, quota: DailyQuota) -> Result<(), RepositoryError> {
        self.store
            .transaction(vec![
                (LAST_WRITE_DATE_KEY.to_string(), Value::from(date_key(quota.date))),
                (DAILY_WRITES_KEY.to_string(), Value::from(quota.writes)),
            ])
            .await
    }

    async fn save_messages(&self, messages: Vec<ChatMessage>) -> Result<(), RepositoryError> {
        let value = encode_messages(&messages)?;
        self.store.put(MESSAGES_KEY, value).await
    }

    async fn commit_message(
        &self,
        messages: Vec<ChatMessage>,
        quota: DailyQuota,
    ) -> Result<(), RepositoryError> {
        let value = encode_messages(&messages)?;
        self.store
            .transaction(vec![
                (MESSAGES_KEY.to_string(), value),
                (LAST_WRITE_DATE_KEY.to_string(), Value::from(date_key(quota.date))),
                (DAILY_WRITES_KEY.to_string(), Value::from(quota.writes)),
            ])
            .await
    }
}
