//! # dotnet_digest
//!
//! An aggregation pipeline for the official Microsoft .NET engineering
//! blogs: it fetches the registered RSS and Atom feeds, enriches every
//! entry with content scraped from its article page, classifies the
//! result, and produces one deduplicated, newest-first digest.
//!
//! ## Features
//!
//! - Aggregates 13 `devblogs.microsoft.com` feeds (RSS 2.0 and Atom)
//! - Extracts readable text, images, and code-block counts from article pages
//! - Classifies articles into a fixed .NET taxonomy and ranks domain keywords
//! - Reports per-feed outcomes; one failing feed never fails the run
//! - Filters by recency and projects the digest by category, query, or count
//!
//! ## Usage
//!
//! ```no_run
//! use dotnet_digest::{fetch_dotnet_content, FetchOptions};
//!
//! # async fn run() -> Result<(), dotnet_digest::FetchError> {
//! let result = fetch_dotnet_content(FetchOptions::default()).await?;
//! println!("{} articles aggregated", result.summary.total_articles);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs in four stages:
//! 1. **Fetching**: Download feed documents, five feeds at a time
//! 2. **Parsing**: Decode RSS/Atom entries, validate and cap them
//! 3. **Enrichment**: Scrape each article page for text, images, and code
//! 4. **Assembly**: Classify, deduplicate, sort, and summarize

pub mod classify;
pub mod error;
pub mod feeds;
pub mod fetcher;
pub mod models;
pub mod outputs;
pub mod utils;

pub use error::FetchError;
pub use fetcher::{fetch_dotnet_content, DotNetFetcher, FetchOptions};
pub use models::FetchResult;
