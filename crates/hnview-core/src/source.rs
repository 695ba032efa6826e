use async_trait::async_trait;

use crate::error::ContentResult;
use crate::model::{Post, Reply};
use crate::ItemId;

/// Read access to the remote content service
///
/// Everything in the view-model layer goes through this trait; the HTTP
/// client is one implementation, tests provide their own.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Ids of the current top-level posts, in ranking order
    async fn fetch_top_level_ids(&self) -> ContentResult<Vec<ItemId>>;

    /// Fetch a single post
    ///
    /// Implementations default `reply_count` to 0 and `reply_ids` to empty
    /// when the upstream record leaves them out.
    async fn fetch_post(&self, id: &ItemId) -> ContentResult<Post>;

    /// Fetch a single reply
    ///
    /// Implementations default `body` to empty, `author` to
    /// [`crate::model::DELETED_AUTHOR`] and `child_reply_ids` to empty when
    /// the upstream record leaves them out.
    async fn fetch_reply(&self, id: &ItemId) -> ContentResult<Reply>;
}
