//! [`ContentSource`] backed by the public Hacker News Firebase API

mod items;

use std::time::Duration;

use async_trait::async_trait;
use hnview_core::error::{BoxedError, DecodeSnafu, NotFoundSnafu, TransportSnafu};
use hnview_core::{ContentResult, ContentSource, ItemId, Post, Reply};
use reqwest::Client;
use serde::de::DeserializeOwned;
use snafu::{OptionExt as _, ResultExt as _, Snafu};
use tracing::debug;
use url::Url;

use crate::items::{CommentItem, StoryItem};

const LOG_TARGET: &str = "hnview::api";

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Snafu)]
pub enum ApiInitError {
    #[snafu(display("Failed to create HTTP client: {source}"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Invalid API base URL: {url}"))]
    InvalidBaseUrl { url: Url },
}

pub type ApiInitResult<T> = std::result::Result<T, ApiInitError>;

pub fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("Valid constant URL")
}

pub struct HnApiClient {
    client: Client,
    base_url: Url,
}

#[bon::bon]
impl HnApiClient {
    #[builder(finish_fn(name = "build"))]
    pub fn new(
        #[builder(default = default_base_url())] base_url: Url,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
    ) -> ApiInitResult<Self> {
        if base_url.cannot_be_a_base() {
            return InvalidBaseUrlSnafu { url: base_url }.fail();
        }

        let client = Client::builder()
            .user_agent(concat!("hnview/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context(HttpClientSnafu)?;

        Ok(Self { client, base_url })
    }
}

impl HnApiClient {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` with `segments` appended as (escaped) path segments
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn item_endpoint(&self, id: &ItemId) -> Url {
        self.endpoint(&["item", &format!("{id}.json")])
    }

    /// GET `url` and decode the JSON body; a JSON `null` yields `None`
    async fn get_json<T>(&self, url: Url) -> ContentResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        debug!(target: LOG_TARGET, %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(BoxedError::from)
            .context(TransportSnafu)?;

        let body = response
            .bytes()
            .await
            .map_err(BoxedError::from)
            .context(TransportSnafu)?;

        serde_json::from_slice(&body)
            .map_err(BoxedError::from)
            .context(DecodeSnafu)
    }

    async fn get_item<T>(&self, id: &ItemId) -> ContentResult<T>
    where
        T: DeserializeOwned,
    {
        self.get_json(self.item_endpoint(id))
            .await?
            .context(NotFoundSnafu { id: id.clone() })
    }
}

#[async_trait]
impl ContentSource for HnApiClient {
    async fn fetch_top_level_ids(&self) -> ContentResult<Vec<ItemId>> {
        let ids: Vec<u64> = self
            .get_json(self.endpoint(&["topstories.json"]))
            .await?
            .unwrap_or_default();

        debug!(target: LOG_TARGET, count = ids.len(), "Fetched top stories");
        Ok(ids.into_iter().map(ItemId::from).collect())
    }

    async fn fetch_post(&self, id: &ItemId) -> ContentResult<Post> {
        self.get_item::<StoryItem>(id).await.map(Post::from)
    }

    async fn fetch_reply(&self, id: &ItemId) -> ContentResult<Reply> {
        self.get_item::<CommentItem>(id).await.map(Reply::from)
    }
}
