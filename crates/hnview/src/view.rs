//! Snapshots of the view-model, gathered through the [`Registry`]

use futures::FutureExt as _;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt as _};
use hnview_client::{EntityState, Registry};
use hnview_core::{ItemId, LoadError, LoadErrorKind, Post, Reply, Timestamp};
use serde::Serialize;
use tracing::debug;

const LOG_TARGET: &str = "hnview::view";

/// Entities awaited at once; fetches themselves are already running
const MAX_CONCURRENT_LOADS: usize = 16;

/// Settled state of one entity
///
/// `data` and `error` both empty means it was still loading.
#[derive(Debug, Clone, Serialize)]
pub struct Loaded<T> {
    pub id: ItemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LoadError>,
}

impl<T> Loaded<T> {
    pub fn new(id: ItemId, state: EntityState<T>) -> Self {
        Self {
            id,
            data: state.data,
            error: state.error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopStoriesView {
    #[serde(skip)]
    pub now: Timestamp,
    pub posts: Vec<Loaded<Post>>,
    pub has_more: bool,
    /// Set when the latest index fetch failed but earlier ids are still shown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LoadError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyNode {
    #[serde(flatten)]
    pub reply: Loaded<Reply>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ReplyNode>,
}

impl ReplyNode {
    /// Children that exist but were not loaded because of the depth limit
    pub fn unloaded_children(&self) -> usize {
        match &self.reply.data {
            Some(reply) if self.children.is_empty() => reply.child_reply_ids.len(),
            _ => 0,
        }
    }
}

/// An item with the reply tree below it
#[derive(Debug, Clone, Serialize)]
pub struct ThreadView<T> {
    #[serde(skip)]
    pub now: Timestamp,
    pub root: T,
    pub replies: Vec<ReplyNode>,
}

/// Settle the top-stories index, reveal `pages` pages and load their posts
///
/// Fails only when the index has never loaded successfully.
pub async fn top_stories(
    registry: &Registry,
    pages: usize,
    reload: bool,
) -> Result<TopStoriesView, LoadError> {
    let index = registry.top_stories();
    let mut state = index.settled().await;

    if reload {
        index.reload().await;
        state = index.state();
    }

    if state.all_ids.is_empty() {
        if let Some(err) = state.error {
            return Err(err);
        }
    }

    for _ in 1..pages {
        index.load_more();
    }
    let state = index.state();

    debug!(
        target: LOG_TARGET,
        visible = state.visible_ids.len(),
        total = state.all_ids.len(),
        "Loading visible posts"
    );

    let posts = stream::iter(&state.visible_ids)
        .map(|id| {
            let loader = registry.get_post(id);
            async move { Loaded::new(loader.id().clone(), loader.settled().await) }
        })
        .buffered(MAX_CONCURRENT_LOADS)
        .collect::<Vec<_>>()
        .await;

    Ok(TopStoriesView {
        now: Timestamp::now(),
        posts,
        has_more: state.has_more,
        error: state.error,
    })
}

/// Load the post `id` and `depth` levels of replies below it
pub async fn post_thread(
    registry: &Registry,
    id: &ItemId,
    depth: usize,
) -> Result<ThreadView<Post>, LoadError> {
    let post = settle(registry.get_post(id).settled().await)?;
    let replies = reply_tree(registry, &post.reply_ids, depth).await;

    Ok(ThreadView {
        now: Timestamp::now(),
        root: post,
        replies,
    })
}

/// Load the reply `id` and `depth` levels of replies below it
pub async fn reply_thread(
    registry: &Registry,
    id: &ItemId,
    depth: usize,
) -> Result<ThreadView<Reply>, LoadError> {
    let reply = settle(registry.get_reply(id).settled().await)?;
    let replies = reply_tree(registry, &reply.child_reply_ids, depth).await;

    Ok(ThreadView {
        now: Timestamp::now(),
        root: reply,
        replies,
    })
}

fn settle<T>(state: EntityState<T>) -> Result<T, LoadError> {
    match (state.data, state.error) {
        (Some(data), _) => Ok(data),
        (None, Some(err)) => Err(err),
        (None, None) => Err(LoadError::new(
            LoadErrorKind::Other,
            "Loading did not finish",
        )),
    }
}

/// Siblings load concurrently; failed replies become leaves
fn reply_tree<'a>(
    registry: &'a Registry,
    ids: &'a [ItemId],
    depth: usize,
) -> BoxFuture<'a, Vec<ReplyNode>> {
    async move {
        if depth == 0 {
            return vec![];
        }

        let loads: Vec<BoxFuture<'a, ReplyNode>> = ids
            .iter()
            .map(|id| {
                async move {
                    let state = registry.get_reply(id).settled().await;
                    let children = match &state.data {
                        Some(reply) => {
                            reply_tree(registry, &reply.child_reply_ids, depth - 1).await
                        }
                        None => vec![],
                    };
                    ReplyNode {
                        reply: Loaded::new(id.clone(), state),
                        children,
                    }
                }
                .boxed()
            })
            .collect();

        stream::iter(loads)
            .buffered(MAX_CONCURRENT_LOADS)
            .collect::<Vec<_>>()
            .await
    }
    .boxed()
}
