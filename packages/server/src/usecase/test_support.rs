//! Test helpers for driving a room without a network.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hiroba_shared::time::ManualClock;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::{context::RoomContext, room::ChatRoom};
use crate::{
    domain::{RoomPolicy, RoomStateRepository, SessionId},
    infrastructure::{
        dto::websocket::ClientFrame,
        repository::DurableRoomStateRepository,
        store::{InMemoryStore, KeyValueStore},
    },
};

pub(crate) const TEST_ROOM_NAME: &str = "test-room";

/// 2024-05-02 12:00:00 UTC
pub(crate) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
}

/// Room over an in-memory store and a manual clock
pub(crate) struct TestRoom {
    pub room: ChatRoom,
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryStore>,
}

/// A connected test client and the frames the room sent it
pub(crate) struct TestClient {
    pub session_id: SessionId,
    pub rx: UnboundedReceiver<String>,
}

impl TestClient {
    /// Frames received since the last call
    pub fn frames(&mut self) -> Vec<Value> {
        TestRoom::drain(&mut self.rx)
    }
}

pub(crate) fn frame_types(frames: &[Value]) -> Vec<&str> {
    frames
        .iter()
        .map(|f| f["type"].as_str().unwrap_or_default())
        .collect()
}

impl TestRoom {
    pub fn new() -> Self {
        Self::with_policy_and_entries(RoomPolicy::default(), [])
    }

    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Self::with_policy_and_entries(RoomPolicy::default(), entries)
    }

    pub fn with_policy(policy: RoomPolicy) -> Self {
        Self::with_policy_and_entries(policy, [])
    }

    pub fn with_policy_and_entries<I>(policy: RoomPolicy, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let store = Arc::new(InMemoryStore::with_entries(entries));
        let repository = Arc::new(DurableRoomStateRepository::new(store.clone()));
        Self::build(repository, store, policy)
    }

    /// Room over an arbitrary repository (e.g. a mock). `store` stays empty.
    pub fn with_repository(repository: Arc<dyn RoomStateRepository>) -> Self {
        Self::build(repository, Arc::new(InMemoryStore::new()), RoomPolicy::default())
    }

    fn build(
        repository: Arc<dyn RoomStateRepository>,
        store: Arc<InMemoryStore>,
        policy: RoomPolicy,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(start_time()));
        let context = RoomContext::new(repository, clock.clone(), policy, StdRng::seed_from_u64(7));
        Self {
            room: ChatRoom::new(TEST_ROOM_NAME, context),
            clock,
            store,
        }
    }

    /// A fresh room over the same store at `now`, as after a process restart
    pub fn restart_at(&self, now: DateTime<Utc>) -> Self {
        let repository = Arc::new(DurableRoomStateRepository::new(self.store.clone()));
        let restarted = Self::build(repository, self.store.clone(), RoomPolicy::default());
        restarted.clock.set(now);
        restarted
    }

    pub fn today_key() -> String {
        "2024-05-02".to_string()
    }

    pub fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(text) = rx.try_recv() {
            frames.push(serde_json::from_str(&text).unwrap());
        }
        frames
    }

    pub fn advance_millis(&self, millis: i64) {
        self.clock.advance(chrono::Duration::milliseconds(millis));
    }

    /// Connect an unidentified client
    pub async fn connect(&self) -> TestClient {
        let (tx, rx) = mpsc::unbounded_channel();
        let session_id = self.room.accept(Box::new(tx)).await;
        TestClient { session_id, rx }
    }

    /// Connect and complete the handshake, discarding the frames received so far
    pub async fn join(&self, id: &str, name: &str) -> TestClient {
        let mut client = self.connect().await;
        self.send(
            &client,
            ClientFrame::Identity {
                id: id.to_string(),
                name: Some(name.to_string()),
                avatar: None,
            },
        )
        .await;
        client.frames();
        client
    }

    pub async fn send(&self, client: &TestClient, frame: ClientFrame) {
        self.room.handle_frame(client.session_id, frame).await;
    }

    pub async fn chat(&self, client: &TestClient, text: &str) {
        self.send(
            client,
            ClientFrame::Chat {
                text: text.to_string(),
            },
        )
        .await;
    }

    /// Raw value stored under `key`
    pub async fn stored(&self, key: &str) -> Option<Value> {
        self.store.get(key).await.unwrap()
    }
}
