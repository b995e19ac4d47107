//! Article classification: taxonomy scoring and keyword extraction.
//!
//! Both classifiers are pure functions over already-fetched text, driven
//! by fixed compiled tables. Nothing here touches the network.

pub mod category;
pub mod keywords;

pub use category::{categorize, GENERAL_CATEGORY};
pub use keywords::{extract_keywords, MAX_KEYWORDS};
