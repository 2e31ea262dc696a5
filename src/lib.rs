//! # bib-merge
//!
//! Merges bibliographic exports from several literature databases (Scopus,
//! IEEE Xplore, ScienceDirect, ...) into one deduplicated list for systematic
//! review work.
//!
//! ## Architecture
//!
//! - [`models`]: Raw tables and standardized records
//! - [`schema`]: Mapping heterogeneous export headers onto standard fields
//! - [`utils`]: DOI/title normalization, deduplication and reporting
//! - [`io`]: Reading exports with encoding fallback, writing the merged CSV
//! - [`pipeline`]: Input argument parsing and the end-to-end run
//! - [`config`]: Configuration management

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod utils;

// Re-export commonly used types
pub use error::{MergeError, Result};
pub use models::StandardRecord;
pub use pipeline::{run, InputSpec, RunOptions, RunReport};
pub use utils::{merge_records, DedupOptions, Precedence};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
