//! Binary entry point for the .NET digest aggregator.
//!
//! Parses the CLI, runs one aggregation pass over the feed registry, and
//! writes the resulting JSON digest (full or projected) into a dated
//! directory under the output root.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::Cli;
use dotnet_digest::feeds::DOTNET_FEEDS;
use dotnet_digest::fetcher::{fetch_dotnet_content, FetchOptions};
use dotnet_digest::outputs::json;
use dotnet_digest::utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("dotnet_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output_dir, ?args.max_per_feed, ?args.max_age_days, "Parsed CLI arguments");

    if args.list_feeds {
        for feed in DOTNET_FEEDS {
            println!("{}: {}", feed.name, feed.url);
        }
        return Ok(());
    }

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Fetch, enrich, classify ----
    let options = FetchOptions {
        max_per_feed: args.max_per_feed,
        max_age_days: args.max_age_days,
    };
    let result = fetch_dotnet_content(options).await?;
    info!(
        articles = result.summary.total_articles,
        successful_feeds = result.summary.successful_feeds,
        failed_feeds = result.summary.failed_feeds,
        "Aggregation completed"
    );

    // ---- Write digest (full or projected) ----
    let written = if let Some(ref category) = args.category {
        let projection = result.project_category(category);
        info!(category = %category, count = projection.count, "Writing category projection");
        json::write_digest(&projection, &args.output_dir).await
    } else if let Some(ref query) = args.search {
        let projection = result.project_search(query);
        info!(query = %query, count = projection.count, "Writing search projection");
        json::write_digest(&projection, &args.output_dir).await
    } else if let Some(limit) = args.latest {
        let projection = result.project_latest(limit);
        info!(limit, count = projection.count, "Writing latest projection");
        json::write_digest(&projection, &args.output_dir).await
    } else {
        json::write_digest(&result, &args.output_dir).await
    };

    match written {
        Ok(path) => info!(path = %path, "Digest written"),
        Err(e) => {
            error!(error = %e, "Failed to write digest");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
