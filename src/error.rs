//! Error taxonomy for the aggregation pipeline.
//!
//! Only feed-level problems surface as errors: a feed that cannot be
//! fetched is reported per feed and never takes down the run. Everything
//! below feed level (invalid entries, unreachable article pages,
//! unparseable dates) degrades to an empty or fallback value instead.

use thiserror::Error;

/// A feed-level failure.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure, timeout, or HTTP client construction problem.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed endpoint answered with a non-success status code.
    #[error("feed responded with HTTP {0}")]
    BadStatus(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_display() {
        let err = FetchError::BadStatus(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "feed responded with HTTP 404 Not Found");
    }
}
