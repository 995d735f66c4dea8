//! Room state owned by the room actor.
//!
//! `RoomContext` bundles everything a handler may touch. The actor keeps it
//! behind one exclusive lock, so every use case runs against a serialized
//! history of events.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use hiroba_shared::time::Clock;
use rand::rngs::StdRng;

use super::broadcast::SessionRegistry;
use crate::domain::{
    ChatMessage, DailyQuota, RepositoryError, RoomPolicy, RoomStateRepository, Timestamp,
    Transcript,
};

/// Durable room state with a lazily filled cache.
///
/// Each field is read from the repository on first access. The cache is only
/// updated after the corresponding write has been committed.
pub struct RoomState {
    repository: Arc<dyn RoomStateRepository>,
    capacity: usize,
    transcript: Option<Transcript>,
    quota: Option<DailyQuota>,
}

impl RoomState {
    pub fn new(repository: Arc<dyn RoomStateRepository>, capacity: usize) -> Self {
        Self {
            repository,
            capacity,
            transcript: None,
            quota: None,
        }
    }

    /// Current transcript.
    pub async fn transcript(&mut self) -> Result<&Transcript, RepositoryError> {
        let transcript = match self.transcript.take() {
            Some(transcript) => transcript,
            None => {
                let messages = self.repository.load_messages().await?;
                Transcript::from_messages(messages, self.capacity)
            }
        };
        Ok(self.transcript.insert(transcript))
    }

    /// Stored quota, as last persisted (no rollover applied).
    async fn stored_quota(&mut self, today: NaiveDate) -> Result<DailyQuota, RepositoryError> {
        if let Some(quota) = self.quota {
            return Ok(quota);
        }
        let quota = self.repository.load_quota(today).await?;
        self.quota = Some(quota);
        Ok(quota)
    }

    /// Quota as seen on `today`, without persisting a rollover.
    pub async fn quota_view(&mut self, today: NaiveDate) -> Result<DailyQuota, RepositoryError> {
        Ok(self.stored_quota(today).await?.as_of(today))
    }

    /// Reset the counter if the UTC date changed, persisting date and counter.
    pub async fn roll_over_quota(&mut self, today: NaiveDate) -> Result<DailyQuota, RepositoryError> {
        let quota = self.stored_quota(today).await?;
        if !quota.needs_rollover(today) {
            return Ok(quota);
        }
        let fresh = DailyQuota::new(today, 0);
        self.repository.save_quota(fresh).await?;
        tracing::info!(
            previous_date = %quota.date,
            previous_writes = quota.writes,
            date = %today,
            "daily quota rolled over"
        );
        self.quota = Some(fresh);
        Ok(fresh)
    }

    /// Append `message` and count it against `quota` in one transaction.
    ///
    /// Returns the number of messages evicted to stay within capacity.
    pub async fn append_message(
        &mut self,
        message: ChatMessage,
        quota: DailyQuota,
    ) -> Result<usize, RepositoryError> {
        let mut next = self.transcript().await?.clone();
        let evicted = next.push(message).len();
        let next_quota = quota.incremented();
        self.repository
            .commit_message(next.to_vec(), next_quota)
            .await?;
        self.transcript = Some(next);
        self.quota = Some(next_quota);
        Ok(evicted)
    }

    /// Persist a modified transcript and make it current.
    pub async fn replace_transcript(&mut self, next: Transcript) -> Result<(), RepositoryError> {
        self.repository.save_messages(next.to_vec()).await?;
        self.transcript = Some(next);
        Ok(())
    }
}

/// Everything the room actor owns
pub struct RoomContext {
    pub sessions: SessionRegistry,
    pub state: RoomState,
    /// Entropy for fallback display names
    pub rng: StdRng,
    pub clock: Arc<dyn Clock>,
    pub policy: RoomPolicy,
}

impl RoomContext {
    pub fn new(
        repository: Arc<dyn RoomStateRepository>,
        clock: Arc<dyn Clock>,
        policy: RoomPolicy,
        rng: StdRng,
    ) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            state: RoomState::new(repository, policy.transcript_capacity),
            rng,
            clock,
            policy,
        }
    }

    /// Current instant, read once per event
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn now_timestamp(&self) -> Timestamp {
        Timestamp::from(self.now())
    }
}
