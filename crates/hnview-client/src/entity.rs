use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use hnview_core::{ContentResult, ContentSource, ItemId, LoadError, Post, Reply};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cell::{StateCell, Subscription};

const LOG_TARGET: &str = "hnview::entity";

/// An item type that can be fetched by id
pub trait Entity: Clone + Send + Sync + 'static {
    /// Used in logs
    const KIND: &'static str;

    fn fetch<'a>(
        source: &'a dyn ContentSource,
        id: &'a ItemId,
    ) -> BoxFuture<'a, ContentResult<Self>>;
}

impl Entity for Post {
    const KIND: &'static str = "post";

    fn fetch<'a>(
        source: &'a dyn ContentSource,
        id: &'a ItemId,
    ) -> BoxFuture<'a, ContentResult<Self>> {
        source.fetch_post(id)
    }
}

impl Entity for Reply {
    const KIND: &'static str = "reply";

    fn fetch<'a>(
        source: &'a dyn ContentSource,
        id: &'a ItemId,
    ) -> BoxFuture<'a, ContentResult<Self>> {
        source.fetch_reply(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityState<E> {
    pub loading: bool,
    pub data: Option<E>,
    pub error: Option<LoadError>,
}

impl<E> EntityState<E> {
    /// Not loading, and either loaded or failed
    pub fn is_settled(&self) -> bool {
        !self.loading && (self.data.is_some() || self.error.is_some())
    }
}

impl<E> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            loading: false,
            data: None,
            error: None,
        }
    }
}

/// View-model of a single remote item
///
/// Holds the observable [`EntityState`] of the item with id [`Self::id`] and
/// fetches it at most once successfully.
pub struct EntityLoader<E> {
    source: Arc<dyn ContentSource>,
    id: ItemId,
    state: StateCell<EntityState<E>>,
}

pub type PostLoader = EntityLoader<Post>;
pub type ReplyLoader = EntityLoader<Reply>;

impl<E> EntityLoader<E>
where
    E: Entity,
{
    pub fn new(source: Arc<dyn ContentSource>, id: ItemId) -> Self {
        Self {
            source,
            id,
            state: StateCell::default(),
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn state(&self) -> EntityState<E> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<EntityState<E>> {
        self.state.subscribe()
    }

    pub fn on_update(
        &self,
        listener: impl Fn(&EntityState<E>) + Send + Sync + 'static,
    ) -> Subscription {
        self.state.on_update(listener)
    }

    /// Wait until the loader holds either data or an error
    pub async fn settled(&self) -> EntityState<E> {
        self.state.wait_for(EntityState::is_settled).await
    }

    /// Start loading the item, unless already loading or loaded
    ///
    /// The guard check and the switch to `loading` happen right away, when
    /// this is called, and the fetch is spawned as a Tokio task that always
    /// publishes its outcome. The returned future only waits for that task;
    /// dropping it does not cancel the fetch. When the call was a no-op, the
    /// future completes immediately.
    ///
    /// Failures are never returned, they end up in [`EntityState::error`].
    /// Must be called within a Tokio runtime.
    pub fn load(self: &Arc<Self>) -> BoxFuture<'static, ()> {
        let started = self.state.try_update(|state| {
            if state.loading || state.data.is_some() {
                return false;
            }
            state.loading = true;
            true
        });

        if !started {
            return futures::future::ready(()).boxed();
        }

        let this = self.clone();
        let fetch = tokio::spawn(async move { this.fetch().await });
        let id = self.id.clone();
        async move {
            if let Err(err) = fetch.await {
                warn!(target: LOG_TARGET, kind = E::KIND, %id, %err, "Fetch task failed");
            }
        }
        .boxed()
    }

    async fn fetch(&self) {
        debug!(target: LOG_TARGET, kind = E::KIND, id = %self.id, "Fetching");

        let res = match AssertUnwindSafe(E::fetch(self.source.as_ref(), &self.id))
            .catch_unwind()
            .await
        {
            Ok(res) => res.map_err(LoadError::from),
            Err(panic) => Err(LoadError::from_panic(panic)),
        };

        match res {
            Ok(data) => {
                debug!(target: LOG_TARGET, kind = E::KIND, id = %self.id, "Fetched");
                self.state.update(|state| {
                    state.loading = false;
                    state.error = None;
                    state.data = Some(data);
                });
            }
            Err(err) => {
                warn!(target: LOG_TARGET, kind = E::KIND, id = %self.id, err = %err, "Fetch failed");
                self.state.update(|state| {
                    state.loading = false;
                    state.error = Some(err);
                });
            }
        }
    }
}
