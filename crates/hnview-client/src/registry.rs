use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};

use hnview_core::{ContentSource, ItemId, Post, Reply};
use tracing::{debug, trace};

use crate::entity::{Entity, EntityLoader, PostLoader, ReplyLoader};
use crate::index::{DEFAULT_PAGE_SIZE, IndexLoader};

const LOG_TARGET: &str = "hnview::registry";

type LoaderCache<E> = Mutex<HashMap<ItemId, Arc<EntityLoader<E>>>>;

/// Root of the view-model layer
///
/// Owns the top-stories index and one loader per post/reply id ever asked
/// for. Loaders are created on first access, start loading right away, and
/// are handed out again on every later access.
///
/// Creating a `Registry` and calling [`Registry::get_post`] /
/// [`Registry::get_reply`] spawns tasks, so it must happen within a Tokio
/// runtime.
pub struct Registry {
    source: Arc<dyn ContentSource>,
    top_stories: Arc<IndexLoader>,
    posts: LoaderCache<Post>,
    replies: LoaderCache<Reply>,
}

#[bon::bon]
impl Registry {
    #[builder(finish_fn(name = "build"))]
    pub fn new(
        #[builder(start_fn)] source: Arc<dyn ContentSource>,
        #[builder(default = DEFAULT_PAGE_SIZE)] page_size: usize,
    ) -> Self {
        let top_stories = Arc::new(IndexLoader::new(source.clone(), page_size));
        // The fetch runs in its own task
        drop(top_stories.load());

        debug!(target: LOG_TARGET, page_size = top_stories.page_size(), "Registry created");

        Self {
            source,
            top_stories,
            posts: Mutex::new(HashMap::new()),
            replies: Mutex::new(HashMap::new()),
        }
    }
}

impl Registry {
    pub fn top_stories(&self) -> &Arc<IndexLoader> {
        &self.top_stories
    }

    /// Loader of the post `id`, created and started on first access
    pub fn get_post(&self, id: &ItemId) -> Arc<PostLoader> {
        self.get_or_create(&self.posts, id)
    }

    /// Loader of the reply `id`, created and started on first access
    pub fn get_reply(&self, id: &ItemId) -> Arc<ReplyLoader> {
        self.get_or_create(&self.replies, id)
    }

    pub fn cached_post_count(&self) -> usize {
        self.posts.lock().expect("Locking failed").len()
    }

    pub fn cached_reply_count(&self) -> usize {
        self.replies.lock().expect("Locking failed").len()
    }

    fn get_or_create<E>(&self, cache: &LoaderCache<E>, id: &ItemId) -> Arc<EntityLoader<E>>
    where
        E: Entity,
    {
        let mut lock = cache.lock().expect("Locking failed");

        match lock.entry(id.clone()) {
            Entry::Occupied(entry) => {
                trace!(target: LOG_TARGET, kind = E::KIND, %id, "Cache hit");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                debug!(target: LOG_TARGET, kind = E::KIND, %id, "Creating loader");
                let loader = Arc::new(EntityLoader::new(self.source.clone(), id.clone()));
                drop(loader.load());
                entry.insert(loader).clone()
            }
        }
    }
}
