//! Normalization, deduplication and reporting.
//!
//! - [`norm_doi`] / [`norm_title`]: comparison keys for DOIs and titles
//! - [`merge_records`]: concatenate per-source batches and remove duplicates
//! - [`Precedence`]: source ordering used to pick a winner among duplicates
//! - [`compute_stats`] / [`overlaps_by_title`]: diagnostics for a run
//!
//! # Deduplication
//!
//! ```rust
//! use bib_merge::models::StandardRecord;
//! use bib_merge::utils::{merge_records, DedupOptions, Precedence};
//!
//! let scopus = vec![StandardRecord::builder("Scopus")
//!     .title("Foo")
//!     .doi("10.1234/x")
//!     .build()];
//! let ieee = vec![StandardRecord::builder("IEEE Xplore")
//!     .title("Foo Bar")
//!     .doi("10.1234/X")
//!     .build()];
//!
//! let outcome = merge_records(
//!     vec![scopus, ieee],
//!     &Precedence::parse("Scopus,IEEE Xplore"),
//!     DedupOptions::default(),
//! );
//! assert_eq!(outcome.records.len(), 1);
//! assert_eq!(outcome.records[0].source(), "Scopus");
//! ```

mod dedup;
mod normalize;
mod report;

pub use dedup::{
    concat_ranked, dedup_merged, dedup_records, merge_records, DedupOptions, MergeOutcome,
    MergeStats, Precedence, DEFAULT_PRECEDENCE,
};
pub use normalize::{norm_doi, norm_title};
pub use report::{
    compute_stats, counts_table, overlaps_by_title, overlaps_table, Overlaps, SourceCounts,
};
