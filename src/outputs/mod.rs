//! Output generation for the aggregation digest.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2026-08-26/
//!     └── digest.json
//! ```

pub mod json;
