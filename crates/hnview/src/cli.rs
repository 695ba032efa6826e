use clap::{Args, Parser, Subcommand};
use hnview_api::DEFAULT_BASE_URL;
use hnview_client::DEFAULT_PAGE_SIZE;
use hnview_core::ItemId;
use url::Url;

/// Terminal Hacker News reader
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    /// Global options that apply to all commands
    #[command(flatten)]
    pub global: GlobalOpts,

    /// The specific command to execute
    #[command(subcommand)]
    pub cmd: OptsCmd,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Base URL of the Hacker News API
    #[arg(long, env = "HNVIEW_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: Url,

    /// Number of top stories revealed per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
pub enum OptsCmd {
    /// List top stories
    Top {
        /// Number of pages to reveal
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Fetch the story list a second time before listing
        #[arg(long)]
        reload: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show a story and its replies
    Item(ThreadOpts),
    /// Show a reply and the replies below it
    Reply(ThreadOpts),
}

#[derive(Debug, Args)]
pub struct ThreadOpts {
    /// Id of the item to show
    pub id: ItemId,

    /// Levels of replies to load below the item
    #[arg(long, default_value = "2")]
    pub depth: usize,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
