//! Wire format of the Hacker News item API

use hnview_core::model::DELETED_AUTHOR;
use hnview_core::{ItemId, Post, Reply, Timestamp};
use serde::Deserialize;

/// `item/<id>.json` for a story
///
/// Deleted or dead stories come with most fields missing; they still decode.
#[derive(Debug, Deserialize)]
pub(crate) struct StoryItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub time: u64,
    pub url: Option<String>,
    /// Total comment count
    pub descendants: Option<i64>,
    #[serde(default)]
    pub kids: Vec<u64>,
}

impl From<StoryItem> for Post {
    fn from(item: StoryItem) -> Self {
        Self {
            id: ItemId::from(item.id),
            title: item.title,
            author: item.by,
            submitted_at: Timestamp::from(item.time),
            external_url: item.url,
            score: item.score,
            reply_count: item.descendants.unwrap_or_default(),
            reply_ids: item.kids.into_iter().map(ItemId::from).collect(),
        }
    }
}

/// `item/<id>.json` for a comment
#[derive(Debug, Deserialize)]
pub(crate) struct CommentItem {
    pub id: u64,
    pub text: Option<String>,
    pub by: Option<String>,
    #[serde(default)]
    pub time: u64,
    pub parent: u64,
    #[serde(default)]
    pub kids: Vec<u64>,
}

impl From<CommentItem> for Reply {
    fn from(item: CommentItem) -> Self {
        Self {
            id: ItemId::from(item.id),
            body: item.text.unwrap_or_default(),
            author: item.by.unwrap_or_else(|| DELETED_AUTHOR.to_owned()),
            submitted_at: Timestamp::from(item.time),
            parent_id: ItemId::from(item.parent),
            child_reply_ids: item.kids.into_iter().map(ItemId::from).collect(),
        }
    }
}
