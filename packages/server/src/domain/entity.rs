//! Core domain models for the chat room.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    error::RetractError,
    value_object::{IdentityId, MessageId, Timestamp},
};

/// Default maximum number of messages kept in the transcript
pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 100;

/// Default number of chat messages the room accepts per UTC day
pub const DEFAULT_DAILY_WRITE_LIMIT: u64 = 100_000;

/// Text that replaces the body of a retracted message
pub const RETRACTED_PLACEHOLDER: &str = "This message was retracted.";

/// Resolved identity of a session, fixed at handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub avatar: String,
}

impl Identity {
    pub fn new(id: IdentityId, name: String, avatar: String) -> Self {
        Self { id, name, avatar }
    }
}

/// A chat message in the transcript.
///
/// Author fields are a snapshot of the sender's identity at creation time.
/// The serialized form is the one stored under the `messages` key and sent
/// to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message_id: MessageId,
    #[serde(rename = "id")]
    pub author_id: IdentityId,
    #[serde(rename = "name")]
    pub author_name: String,
    #[serde(rename = "avatar")]
    pub author_avatar: String,
    pub text: String,
    pub timestamp: Timestamp,
    #[serde(rename = "isRetracted", default)]
    pub retracted: bool,
}

impl ChatMessage {
    /// Create a new message authored by `author`
    pub fn new(message_id: MessageId, author: &Identity, text: String, timestamp: Timestamp) -> Self {
        Self {
            message_id,
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            author_avatar: author.avatar.clone(),
            text,
            timestamp,
            retracted: false,
        }
    }

    /// Retract this message on behalf of `requester`.
    ///
    /// Succeeds only for the author, once, and while less than `window_ms`
    /// has passed since the message was created.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition as a `RetractError`.
    pub fn retract(
        &mut self,
        requester: &IdentityId,
        now: Timestamp,
        window_ms: i64,
    ) -> Result<(), RetractError> {
        if &self.author_id != requester {
            return Err(RetractError::NotAuthor);
        }
        if self.retracted {
            return Err(RetractError::AlreadyRetracted);
        }
        let elapsed_ms = now.millis_since(self.timestamp);
        if elapsed_ms >= window_ms {
            return Err(RetractError::WindowExpired {
                window_ms,
                elapsed_ms,
            });
        }
        self.retracted = true;
        self.text = RETRACTED_PLACEHOLDER.to_string();
        Ok(())
    }
}

/// Capacity-bounded message history, oldest first.
///
/// Appending beyond capacity evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl Transcript {
    /// Create an empty transcript
    #[cfg(test)]
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a transcript from stored messages, keeping the newest `capacity`
    pub fn from_messages(messages: Vec<ChatMessage>, capacity: usize) -> Self {
        let mut transcript = Self {
            messages: messages.into(),
            capacity,
        };
        transcript.evict_overflow();
        transcript
    }

    /// Append a message, returning the evicted oldest entries (if any)
    pub fn push(&mut self, message: ChatMessage) -> Vec<ChatMessage> {
        self.messages.push_back(message);
        self.evict_overflow()
    }

    fn evict_overflow(&mut self) -> Vec<ChatMessage> {
        let mut evicted = Vec::new();
        while self.messages.len() > self.capacity {
            if let Some(oldest) = self.messages.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    #[cfg(test)]
    pub fn find(&self, message_id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.message_id == message_id)
    }

    pub fn find_mut(&mut self, message_id: &MessageId) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| &m.message_id == message_id)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Room-wide write counter for one UTC calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyQuota {
    /// Date the counter was last reset
    pub date: NaiveDate,
    /// Chat messages accepted since `date`
    pub writes: u64,
}

impl DailyQuota {
    pub fn new(date: NaiveDate, writes: u64) -> Self {
        Self { date, writes }
    }

    /// Whether the counter belongs to a different day than `today`
    pub fn needs_rollover(&self, today: NaiveDate) -> bool {
        self.date != today
    }

    /// The quota as seen on `today`: a fresh counter if the day changed
    pub fn as_of(&self, today: NaiveDate) -> Self {
        if self.needs_rollover(today) {
            Self::new(today, 0)
        } else {
            *self
        }
    }

    pub fn is_exhausted(&self, limit: u64) -> bool {
        self.writes >= limit
    }

    pub fn remaining(&self, limit: u64) -> u64 {
        limit.saturating_sub(self.writes)
    }

    /// Counter after one more accepted message
    pub fn incremented(&self) -> Self {
        Self::new(self.date, self.writes.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::MessageIdFactory;

    fn alice() -> Identity {
        Identity::new(
            IdentityId::new("alice-id".to_string()).unwrap(),
            "Alice".to_string(),
            "🐱".to_string(),
        )
    }

    fn message_at(text: &str, millis: i64) -> ChatMessage {
        ChatMessage::new(
            MessageIdFactory::generate(),
            &alice(),
            text.to_string(),
            Timestamp::new(millis),
        )
    }

    #[test]
    fn test_chat_message_snapshots_author() {
        // テスト項目: メッセージは作成時点の作者情報をコピーして保持する
        // given (前提条件):
        let author = alice();

        // when (操作):
        let message = ChatMessage::new(
            MessageIdFactory::generate(),
            &author,
            "hi".to_string(),
            Timestamp::new(1000),
        );

        // then (期待する結果):
        assert_eq!(message.author_id, author.id);
        assert_eq!(message.author_name, "Alice");
        assert_eq!(message.author_avatar, "🐱");
        assert!(!message.retracted);
    }

    #[test]
    fn test_chat_message_wire_shape() {
        // テスト項目: メッセージは messageId, id, name, avatar, text, timestamp, isRetracted で直列化される
        // given (前提条件):
        let message = message_at("hello", 42);

        // when (操作):
        let value = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(value["messageId"], message.message_id.as_str());
        assert_eq!(value["id"], "alice-id");
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["avatar"], "🐱");
        assert_eq!(value["text"], "hello");
        assert_eq!(value["timestamp"], 42);
        assert_eq!(value["isRetracted"], false);
    }

    #[test]
    fn test_retract_within_window() {
        // テスト項目: 作者は 120 秒以内なら自分のメッセージを取り消せる
        // given (前提条件):
        let mut message = message_at("oops", 0);

        // when (操作):
        let result = message.retract(&alice().id, Timestamp::new(119_000), 120_000);

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert!(message.retracted);
        assert_eq!(message.text, RETRACTED_PLACEHOLDER);
    }

    #[test]
    fn test_retract_after_window_fails() {
        // テスト項目: 120 秒を過ぎると取り消せない
        // given (前提条件):
        let mut message = message_at("oops", 0);

        // when (操作):
        let result = message.retract(&alice().id, Timestamp::new(121_000), 120_000);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RetractError::WindowExpired {
                window_ms: 120_000,
                elapsed_ms: 121_000
            })
        );
        assert!(!message.retracted);
        assert_eq!(message.text, "oops");
    }

    #[test]
    fn test_retract_by_other_identity_fails() {
        // テスト項目: 作者以外は取り消せない
        // given (前提条件):
        let mut message = message_at("mine", 0);
        let bob = IdentityId::new("bob-id".to_string()).unwrap();

        // when (操作):
        let result = message.retract(&bob, Timestamp::new(1), 120_000);

        // then (期待する結果):
        assert_eq!(result, Err(RetractError::NotAuthor));
        assert_eq!(message.text, "mine");
    }

    #[test]
    fn test_retract_twice_fails() {
        // テスト項目: 取り消しは一方向で、二度目はエラーになる
        // given (前提条件):
        let mut message = message_at("once", 0);
        message.retract(&alice().id, Timestamp::new(1), 120_000).unwrap();

        // when (操作):
        let result = message.retract(&alice().id, Timestamp::new(2), 120_000);

        // then (期待する結果):
        assert_eq!(result, Err(RetractError::AlreadyRetracted));
        assert!(message.retracted);
    }

    #[test]
    fn test_transcript_evicts_oldest_beyond_capacity() {
        // テスト項目: 容量を超えると最も古いメッセージから削除される
        // given (前提条件):
        let mut transcript = Transcript::new(3);

        // when (操作):
        for i in 0..5 {
            transcript.push(message_at(&format!("m{i}"), i));
        }

        // then (期待する結果):
        let texts: Vec<&str> = transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_transcript_push_returns_evicted() {
        // テスト項目: push は押し出されたメッセージを返す
        // given (前提条件):
        let mut transcript = Transcript::new(1);
        transcript.push(message_at("first", 1));

        // when (操作):
        let evicted = transcript.push(message_at("second", 2));

        // then (期待する結果):
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].text, "first");
    }

    #[test]
    fn test_transcript_from_oversized_storage_keeps_newest() {
        // テスト項目: 保存済みの履歴が容量を超えていても最新のものだけを残す
        // given (前提条件):
        let stored: Vec<ChatMessage> = (0..150).map(|i| message_at(&format!("m{i}"), i)).collect();

        // when (操作):
        let transcript = Transcript::from_messages(stored, DEFAULT_TRANSCRIPT_CAPACITY);

        // then (期待する結果):
        assert_eq!(transcript.len(), 100);
        assert_eq!(transcript.iter().next().unwrap().text, "m50");
    }

    #[test]
    fn test_transcript_find_by_message_id() {
        // テスト項目: メッセージ ID で検索できる
        // given (前提条件):
        let mut transcript = Transcript::new(10);
        let message = message_at("needle", 1);
        let id = message.message_id.clone();
        transcript.push(message_at("hay", 0));
        transcript.push(message);

        // then (期待する結果):
        assert_eq!(transcript.find(&id).unwrap().text, "needle");
        assert!(transcript.find(&MessageIdFactory::generate()).is_none());
    }

    #[test]
    fn test_daily_quota_rollover_view() {
        // テスト項目: 日付が変わると書き込み数 0 の新しいクォータとして見える
        // given (前提条件):
        let yesterday = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let quota = DailyQuota::new(yesterday, 42);

        // when (操作):
        let current = quota.as_of(today);

        // then (期待する結果):
        assert!(quota.needs_rollover(today));
        assert_eq!(current, DailyQuota::new(today, 0));
        assert_eq!(quota.as_of(yesterday), quota);
    }

    #[test]
    fn test_daily_quota_exhaustion_and_remaining() {
        // テスト項目: 上限に達するとクォータ切れになり、残りは 0 で止まる
        // given (前提条件):
        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let full = DailyQuota::new(today, DEFAULT_DAILY_WRITE_LIMIT);
        let over = DailyQuota::new(today, DEFAULT_DAILY_WRITE_LIMIT + 5);

        // then (期待する結果):
        assert!(full.is_exhausted(DEFAULT_DAILY_WRITE_LIMIT));
        assert_eq!(full.remaining(DEFAULT_DAILY_WRITE_LIMIT), 0);
        assert_eq!(over.remaining(DEFAULT_DAILY_WRITE_LIMIT), 0);
        assert_eq!(DailyQuota::new(today, 1).incremented().writes, 2);
    }
}
