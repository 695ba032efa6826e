use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hnview_core::{ContentError, ContentResult, ContentSource, ItemId, Post, Reply, Timestamp};
use tokio::sync::Semaphore;

/// How the mock source should fail, if at all
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Error(&'static str),
    Panic(&'static str),
}

/// In-memory [`ContentSource`] that records every call
///
/// When created with [`MockSource::gated`], every fetch waits for a permit
/// released with [`MockSource::release`], so tests can observe the
/// in-flight state.
pub struct MockSource {
    top_level_ids: Mutex<Vec<ItemId>>,
    failure: Mutex<Option<Failure>>,
    gate: Semaphore,
    calls: Mutex<BTreeMap<&'static str, Vec<ItemId>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            top_level_ids: Mutex::new(vec![]),
            failure: Mutex::new(None),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
            calls: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Semaphore::new(0),
            ..Self::new()
        }
    }

    pub fn with_top_level_ids(self, count: usize) -> Self {
        self.set_top_level_ids(count);
        self
    }

    pub fn set_top_level_ids(&self, count: usize) {
        *self.top_level_ids.lock().unwrap() = make_ids(count);
    }

    pub fn set_failure(&self, failure: Option<Failure>) {
        *self.failure.lock().unwrap() = failure;
    }

    /// Let `n` pending (or future) fetches through
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self, kind: &'static str) -> Vec<ItemId> {
        self.calls
            .lock()
            .unwrap()
            .get(kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn call_count(&self, kind: &'static str) -> usize {
        self.calls(kind).len()
    }

    async fn enter(&self, kind: &'static str, id: ItemId) -> ContentResult<()> {
        self.calls
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(id);

        self.gate.acquire().await.unwrap().forget();

        let failure = *self.failure.lock().unwrap();
        match failure {
            None => Ok(()),
            Some(Failure::Error(message)) => Err(ContentError::Other {
                message: message.to_owned(),
            }),
            Some(Failure::Panic(payload)) => std::panic::panic_any(payload),
        }
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn fetch_top_level_ids(&self) -> ContentResult<Vec<ItemId>> {
        self.enter("top", ItemId::from("top")).await?;
        Ok(self.top_level_ids.lock().unwrap().clone())
    }

    async fn fetch_post(&self, id: &ItemId) -> ContentResult<Post> {
        self.enter("post", id.clone()).await?;
        Ok(make_post(id))
    }

    async fn fetch_reply(&self, id: &ItemId) -> ContentResult<Reply> {
        self.enter("reply", id.clone()).await?;
        Ok(make_reply(id))
    }
}

pub fn make_ids(count: usize) -> Vec<ItemId> {
    (1..=count as u64).map(ItemId::from).collect()
}

pub fn make_post(id: &ItemId) -> Post {
    Post {
        id: id.clone(),
        title: format!("Story {id}"),
        author: "testuser".into(),
        submitted_at: Timestamp::from(1_234_567_890),
        external_url: Some("https://example.com".into()),
        score: 100,
        reply_count: 10,
        reply_ids: vec![ItemId::from("456"), ItemId::from("789")],
    }
}

pub fn make_reply(id: &ItemId) -> Reply {
    Reply {
        id: id.clone(),
        body: "Test comment".into(),
        author: "testuser".into(),
        submitted_at: Timestamp::from(1_234_567_890),
        parent_id: ItemId::from("456"),
        child_reply_ids: vec![ItemId::from("789")],
    }
}
