mod cli;
mod render;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use cli::{GlobalOpts, Opts, OptsCmd, ThreadOpts};
use hnview_api::{ApiInitError, HnApiClient};
use hnview_client::Registry;
use hnview_core::{ItemId, LoadError};
use serde::Serialize;
use snafu::{ResultExt as _, Snafu};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub const PROJECT_NAME: &str = "hnview";
pub const LOG_TARGET: &str = "hnview::cli";

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("API client initialization error: {source}"))]
    ApiInit { source: ApiInitError },
    #[snafu(display("Failed to load top stories: {source}"))]
    TopStories { source: LoadError },
    #[snafu(display("Failed to load {kind} {id}: {source}"))]
    Root {
        kind: &'static str,
        id: ItemId,
        source: LoadError,
    },
    #[snafu(display("JSON serialization error: {source}"))]
    Json { source: serde_json::Error },
    #[snafu(display("Logging initialization failed"))]
    Logging,
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[snafu::report]
#[tokio::main]
async fn main() -> CliResult<()> {
    init_logging()?;

    let opts = Opts::parse();
    let registry = make_registry(&opts.global)?;

    match opts.cmd {
        OptsCmd::Top {
            pages,
            reload,
            json,
        } => {
            let view = view::top_stories(&registry, pages, reload)
                .await
                .context(TopStoriesSnafu)?;
            print_view(&view, json)?;
        }
        OptsCmd::Item(ThreadOpts { id, depth, json }) => {
            let view = view::post_thread(&registry, &id, depth)
                .await
                .context(RootSnafu { kind: "post", id })?;
            print_view(&view, json)?;
        }
        OptsCmd::Reply(ThreadOpts { id, depth, json }) => {
            let view = view::reply_thread(&registry, &id, depth)
                .await
                .context(RootSnafu { kind: "reply", id })?;
            print_view(&view, json)?;
        }
    }

    debug!(
        target: LOG_TARGET,
        posts = registry.cached_post_count(),
        replies = registry.cached_reply_count(),
        "Done"
    );

    Ok(())
}

fn make_registry(opts: &GlobalOpts) -> CliResult<Registry> {
    let client = HnApiClient::builder()
        .base_url(opts.api_url.clone())
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .context(ApiInitSnafu)?;

    info!(
        target: LOG_TARGET,
        api_url = %client.base_url(),
        page_size = opts.page_size,
        "Starting {PROJECT_NAME}"
    );

    Ok(Registry::builder(Arc::new(client))
        .page_size(opts.page_size)
        .build())
}

fn print_view<V>(view: &V, json: bool) -> CliResult<()>
where
    V: Serialize + std::fmt::Display,
{
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(view).context(JsonSnafu)?
        );
    } else {
        print!("{view}");
    }
    Ok(())
}

pub fn init_logging() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| CliError::Logging)?;

    Ok(())
}
