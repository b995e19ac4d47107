//! JSON digest output.
//!
//! Each run writes one JSON document into a date directory under the
//! output root. Projections (category, search, latest) replace the
//! document, not the file name, so a later full run for the same day
//! overwrites a projected one.

use chrono::Utc;
use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `payload` to `{output_dir}/{date}/digest.json`.
///
/// Creates the date directory as needed and returns the path written.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_digest<T: Serialize>(
    payload: &T,
    output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string(payload)?;

    let date_dir = format!("{}/{}", output_dir, Utc::now().date_naive());
    info!(%date_dir, "Ensuring digest directory exists");
    if let Err(e) = fs::create_dir_all(&date_dir).await {
        error!(%date_dir, error = %e, "Failed to create digest dir");
        return Err(e.into());
    }

    let path = format!("{}/digest.json", date_dir);
    info!(path = %path, "Writing digest");
    fs::write(&path, json).await?;
    info!(path = %path, "Wrote digest JSON");

    Ok(path)
}
