//! Command-line interface definitions for the .NET digest aggregator.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Projection flags are mutually exclusive; at most one view of the digest
//! can be written per run.

use clap::Parser;
use dotnet_digest::fetcher::DEFAULT_MAX_PER_FEED;

/// Command-line arguments for the .NET digest aggregator.
///
/// # Examples
///
/// ```sh
/// # Full digest into ./digest/<date>/digest.json
/// dotnet_digest -o ./digest
///
/// # Five entries per feed, none older than a week
/// dotnet_digest -o ./digest -m 5 --max-age-days 7
///
/// # Only security articles
/// dotnet_digest -o ./digest --category Security
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON digest
    #[arg(short, long)]
    pub output_dir: String,

    /// Maximum number of entries to take from each feed
    #[arg(short, long, default_value_t = DEFAULT_MAX_PER_FEED)]
    pub max_per_feed: usize,

    /// Drop entries older than this many days
    #[arg(long)]
    pub max_age_days: Option<i64>,

    /// Write only articles in this category
    #[arg(long, conflicts_with_all = ["search", "latest"])]
    pub category: Option<String>,

    /// Write only articles matching this query
    #[arg(long, conflicts_with = "latest")]
    pub search: Option<String>,

    /// Write only the given number of most recent articles
    #[arg(long)]
    pub latest: Option<usize>,

    /// List the registered feeds and exit
    #[arg(long)]
    pub list_feeds: bool,
}
