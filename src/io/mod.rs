//! Delimited-text input and output.

mod reader;
mod writer;

pub use reader::{parse_table, read_table, TextEncoding, FALLBACK_ENCODINGS};
pub use writer::{write_records, write_records_to};
