//! Core data models for raw exports and standardized records.

mod record;
mod table;

pub use record::{OutputRow, RecordBuilder, StandardRecord, OUTPUT_COLUMNS};
pub use table::RawTable;
