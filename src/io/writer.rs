//! Writing the deduplicated record list.

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{StandardRecord, OUTPUT_COLUMNS};

/// Write records to any sink: a header row, then one row per record
pub fn write_records_to<W: Write>(
    sink: W,
    records: &[StandardRecord],
    delimiter: u8,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(sink);

    writer.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        writer.serialize(record.to_output_row())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write records to `path`, creating missing parent directories
pub fn write_records(path: &Path, records: &[StandardRecord], delimiter: u8) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    write_records_to(std::io::BufWriter::new(file), records, delimiter)?;

    tracing::debug!(path = %path.display(), rows = records.len(), "Wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_records_to_buffer() {
        let records = vec![
            StandardRecord::builder("Scopus")
                .title("Foo, revisited")
                .year("2020")
                .doi("10.1234/foo")
                .build(),
            StandardRecord::builder("IEEE Xplore").title("Bar").build(),
        ];

        let mut buf = Vec::new();
        write_records_to(&mut buf, &records, b',').unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "source,title,authors,year,doi,url");
        assert_eq!(lines[1], "Scopus,\"Foo, revisited\",,2020,10.1234/foo,");
        assert_eq!(lines[2], "IEEE Xplore,Bar,,,,");
    }

    #[test]
    fn test_write_empty_keeps_header() {
        let mut buf = Vec::new();
        write_records_to(&mut buf, &[], b',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "source,title,authors,year,doi,url\n");
    }

    #[test]
    fn test_write_records_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("merged.csv");

        write_records(&path, &[StandardRecord::builder("Scopus").build()], b',').unwrap();
        assert!(path.exists());
    }
}
