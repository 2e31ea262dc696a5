//! Raw tabular data as loaded from one export file.

/// An ordered collection of rows with named columns.
///
/// Cells that were empty in the source file are stored as `None`. Every row
/// has exactly as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create a table, padding or truncating rows to the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of a column by exact, case-sensitive name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Cell value at (row, column), `None` if empty or out of range
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_padded_and_truncated() {
        let table = RawTable::new(
            vec!["Title".into(), "DOI".into()],
            vec![
                vec![Some("A".into())],
                vec![Some("B".into()), Some("10.1/b".into()), Some("extra".into())],
            ],
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(1, 1), Some("10.1/b"));
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn test_column_index_is_case_sensitive() {
        let table = RawTable::new(vec!["Title".into(), "doi".into()], Vec::new());
        assert_eq!(table.column_index("Title"), Some(0));
        assert_eq!(table.column_index("title"), None);
        assert_eq!(table.column_index("DOI"), None);
        assert!(table.is_empty());
    }
}
