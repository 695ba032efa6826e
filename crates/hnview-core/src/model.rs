use serde::{Deserialize, Serialize};

use crate::{ItemId, Timestamp};

/// Author shown for replies whose upstream record has no author
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A top-level story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub submitted_at: Timestamp,
    /// Link target; `None` for text posts (Ask HN and such)
    pub external_url: Option<String>,
    pub score: u32,
    /// Total number of replies in the thread, as reported upstream
    ///
    /// Upstream occasionally reports negative counts; they are kept as-is.
    pub reply_count: i64,
    /// Direct replies, in the order the service returns them
    pub reply_ids: Vec<ItemId>,
}

impl Post {
    pub fn has_replies(&self) -> bool {
        0 < self.reply_count
    }
}

/// A reply to a post or to another reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: ItemId,
    /// HTML fragment, from a trusted source
    pub body: String,
    pub author: String,
    pub submitted_at: Timestamp,
    pub parent_id: ItemId,
    pub child_reply_ids: Vec<ItemId>,
}

impl Reply {
    pub fn is_deleted_author(&self) -> bool {
        self.author == DELETED_AUTHOR
    }
}
