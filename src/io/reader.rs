//! Reading delimited export files with encoding fallback.

use std::borrow::Cow;
use std::path::Path;

use crate::error::{MergeError, Result};
use crate::models::RawTable;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text encodings tried when decoding an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// UTF-8 with an optional leading byte-order mark
    Utf8Sig,
    /// Latin-1, decoded as Windows-1252 (a superset for printable text)
    Latin1,
}

/// Encodings tried in order until one yields a parseable table
pub const FALLBACK_ENCODINGS: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Utf8Sig,
    TextEncoding::Latin1,
];

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes`, or `None` if they are not valid in this encoding
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            TextEncoding::Utf8Sig => {
                let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(Cow::Borrowed)
            }
            TextEncoding::Latin1 => {
                let (decoded, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                Some(decoded)
            }
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse delimited text with a header row into a table.
///
/// Empty cells become `None`. A missing header row is an error.
pub fn parse_table(content: &str, delimiter: u8) -> std::result::Result<RawTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.is_empty() {
        return Err("no columns to parse".to_string());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}

/// Read an export file, trying each of [`FALLBACK_ENCODINGS`] in order
pub fn read_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let bytes = std::fs::read(path).map_err(|e| MergeError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut last_reason = String::from("no encoding attempted");
    for encoding in FALLBACK_ENCODINGS {
        let Some(content) = encoding.decode(&bytes) else {
            last_reason = format!("not valid {}", encoding);
            continue;
        };

        match parse_table(&content, delimiter) {
            Ok(table) => {
                tracing::debug!(
                    path = %path.display(),
                    %encoding,
                    rows = table.len(),
                    columns = table.headers().len(),
                    "Read export"
                );
                return Ok(table);
            }
            Err(reason) => {
                tracing::trace!(path = %path.display(), %encoding, %reason, "Parse attempt failed");
                last_reason = reason;
            }
        }
    }

    Err(MergeError::Read {
        path: path.to_path_buf(),
        reason: last_reason,
    })
}
