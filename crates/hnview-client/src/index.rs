use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt as _;
use futures::future::BoxFuture;
use hnview_core::{ContentSource, ItemId, LoadError};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cell::{StateCell, Subscription};

const LOG_TARGET: &str = "hnview::index";

/// Number of ids revealed per page, unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexState {
    /// Every top-level id, in ranking order
    pub all_ids: Vec<ItemId>,
    /// Prefix of `all_ids` revealed so far
    pub visible_ids: Vec<ItemId>,
    /// Whether [`IndexLoader::load_more`] might reveal more ids
    ///
    /// Always `true` right after a successful load, even when the first page
    /// already holds every id; the following `load_more` corrects it.
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<LoadError>,
}

impl IndexState {
    /// Not loading, and either loaded or failed
    pub fn is_settled(&self) -> bool {
        // `has_more` is what marks an empty successful load as loaded
        !self.loading && (self.has_more || !self.all_ids.is_empty() || self.error.is_some())
    }
}

/// View-model of the paginated list of top-level posts
///
/// The whole id list is fetched at once; pagination only controls how much
/// of it is visible.
pub struct IndexLoader {
    source: Arc<dyn ContentSource>,
    page_size: usize,
    state: StateCell<IndexState>,
}

impl IndexLoader {
    /// `page_size` is clamped to at least 1
    pub fn new(source: Arc<dyn ContentSource>, page_size: usize) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            state: StateCell::default(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn state(&self) -> IndexState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<IndexState> {
        self.state.subscribe()
    }

    pub fn on_update(&self, listener: impl Fn(&IndexState) + Send + Sync + 'static) -> Subscription {
        self.state.on_update(listener)
    }

    pub async fn settled(&self) -> IndexState {
        self.state.wait_for(IndexState::is_settled).await
    }

    /// Fetch the id list, unless already loading or loaded
    ///
    /// Like [`crate::EntityLoader::load`], the guard runs when this is called
    /// and the fetch runs in a spawned task; the returned future waits for it.
    pub fn load(self: &Arc<Self>) -> BoxFuture<'static, ()> {
        self.load_inner(false)
    }

    /// Fetch the id list again, regardless of the current state
    ///
    /// A fetch already in flight is not cancelled: whichever fetch finishes
    /// last determines the final state.
    pub fn reload(self: &Arc<Self>) -> BoxFuture<'static, ()> {
        self.load_inner(true)
    }

    fn load_inner(self: &Arc<Self>, force: bool) -> BoxFuture<'static, ()> {
        let started = self.state.try_update(|state| {
            if !force && (state.loading || !state.all_ids.is_empty()) {
                return false;
            }
            state.loading = true;
            true
        });

        if !started {
            return futures::future::ready(()).boxed();
        }

        let this = self.clone();
        let fetch = tokio::spawn(async move { this.fetch(force).await });
        async move {
            if let Err(err) = fetch.await {
                warn!(target: LOG_TARGET, force, %err, "Fetch task failed");
            }
        }
        .boxed()
    }

    async fn fetch(&self, force: bool) {
        debug!(target: LOG_TARGET, force, "Fetching top-level ids");

        let res = match AssertUnwindSafe(self.source.fetch_top_level_ids())
            .catch_unwind()
            .await
        {
            Ok(res) => res.map_err(LoadError::from),
            Err(panic) => Err(LoadError::from_panic(panic)),
        };

        match res {
            Ok(ids) => {
                debug!(target: LOG_TARGET, count = ids.len(), "Fetched top-level ids");
                let page_size = self.page_size;
                self.state.update(move |state| {
                    state.visible_ids = ids.iter().take(page_size).cloned().collect();
                    state.all_ids = ids;
                    state.has_more = true;
                    state.loading = false;
                    state.error = None;
                });
            }
            Err(err) => {
                warn!(target: LOG_TARGET, err = %err, "Fetching top-level ids failed");
                self.state.update(|state| {
                    state.loading = false;
                    state.error = Some(err);
                });
            }
        }
    }

    /// Reveal the next page of ids
    ///
    /// No-op when [`IndexState::has_more`] is `false`. Never touches the
    /// network.
    pub fn load_more(&self) {
        let page_size = self.page_size;
        let revealed = self.state.try_update(|state| {
            if !state.has_more {
                return false;
            }

            let start = state.visible_ids.len();
            state
                .visible_ids
                .extend(state.all_ids.iter().skip(start).take(page_size).cloned());
            state.has_more = state.visible_ids.len() < state.all_ids.len();
            true
        });

        if revealed {
            debug!(target: LOG_TARGET, "Revealed next page");
        }
    }
}
