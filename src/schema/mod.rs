//! Best-effort mapping of heterogeneous export headers onto [`StandardRecord`].
//!
//! Each target field has an ordered list of acceptable column names. The first
//! candidate present in a table's header (exact, case-sensitive match) supplies
//! that field for every row. A field with no matching column is left absent,
//! except `title`, which falls back to the table's first column.

use serde::{Deserialize, Serialize};

use crate::models::{RawTable, StandardRecord};

/// Built-in title columns (Scopus, IEEE Xplore, ScienceDirect and friends)
pub const TITLE_COLUMNS: &[&str] = &[
    "Document Title",
    "Title",
    "Article Title",
    "Item Title",
    "publicationTitle",
    "title",
];

pub const DOI_COLUMNS: &[&str] = &["DOI", "doi", "DOI Link", "DOI URL", "Article DOI", "Link"];

pub const YEAR_COLUMNS: &[&str] = &["Publication Year", "Year", "Issue Year", "Publication year"];

pub const AUTHOR_COLUMNS: &[&str] = &[
    "Authors",
    "Authors Full Names",
    "Author(s)",
    "Authors Name",
    "AuthorsNames",
    "Authors with affiliations",
    "Authors/Affiliations",
];

pub const URL_COLUMNS: &[&str] = &[
    "PDF Link",
    "Link",
    "URL",
    "Document Link",
    "Article URL",
    "source",
];

/// Ordered candidate column names for each standard field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCandidates {
    #[serde(default)]
    pub title: Vec<String>,

    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub year: Vec<String>,

    #[serde(default)]
    pub doi: Vec<String>,

    #[serde(default)]
    pub url: Vec<String>,
}

impl Default for ColumnCandidates {
    fn default() -> Self {
        Self {
            title: owned(TITLE_COLUMNS),
            authors: owned(AUTHOR_COLUMNS),
            year: owned(YEAR_COLUMNS),
            doi: owned(DOI_COLUMNS),
            url: owned(URL_COLUMNS),
        }
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl ColumnCandidates {
    /// Append extra candidates after the existing ones, skipping names already listed
    pub fn extend(mut self, extra: &ColumnCandidates) -> Self {
        fn append(target: &mut Vec<String>, more: &[String]) {
            for name in more {
                if !target.contains(name) {
                    target.push(name.clone());
                }
            }
        }

        append(&mut self.title, &extra.title);
        append(&mut self.authors, &extra.authors);
        append(&mut self.year, &extra.year);
        append(&mut self.doi, &extra.doi);
        append(&mut self.url, &extra.url);
        self
    }
}

/// Columns chosen for one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    pub title: Option<usize>,
    pub authors: Option<usize>,
    pub year: Option<usize>,
    pub doi: Option<usize>,
    pub url: Option<usize>,
}

/// Index of the first candidate present in `headers`
pub fn pick_column<S: AsRef<str>>(headers: &[String], candidates: &[S]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|c| headers.iter().position(|h| h == c.as_ref()))
}

/// Maps raw tables onto standard records using a set of column candidates
#[derive(Debug, Clone, Default)]
pub struct SchemaMapper {
    candidates: ColumnCandidates,
}

impl SchemaMapper {
    pub fn new(candidates: ColumnCandidates) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &ColumnCandidates {
        &self.candidates
    }

    /// Resolve which column feeds each field
    pub fn select(&self, headers: &[String]) -> ColumnSelection {
        let title = pick_column(headers, &self.candidates.title)
            .or_else(|| (!headers.is_empty()).then_some(0));

        ColumnSelection {
            title,
            authors: pick_column(headers, &self.candidates.authors),
            year: pick_column(headers, &self.candidates.year),
            doi: pick_column(headers, &self.candidates.doi),
            url: pick_column(headers, &self.candidates.url),
        }
    }

    /// Convert every row of `table` into a record tagged with `label`
    pub fn extract(
        &self,
        table: &RawTable,
        label: &str,
        origin_file: Option<&str>,
    ) -> Vec<StandardRecord> {
        let selection = self.select(table.headers());
        let header_name = |idx: Option<usize>| idx.map(|i| table.headers()[i].as_str());

        tracing::debug!(
            source = label,
            title = ?header_name(selection.title),
            authors = ?header_name(selection.authors),
            year = ?header_name(selection.year),
            doi = ?header_name(selection.doi),
            url = ?header_name(selection.url),
            "Selected columns"
        );

        let cell = |row: usize, column: Option<usize>| {
            column.and_then(|c| table.cell(row, c)).map(str::to_string)
        };

        (0..table.len())
            .map(|row| {
                let builder = StandardRecord::builder(label)
                    .maybe_title(cell(row, selection.title))
                    .maybe_authors(cell(row, selection.authors))
                    .maybe_year(cell(row, selection.year))
                    .maybe_doi(cell(row, selection.doi))
                    .maybe_url(cell(row, selection.url));

                let builder = match origin_file {
                    Some(name) => builder.origin_file(name),
                    None => builder,
                };
                builder.build()
            })
            .collect()
    }
}

/// Extract standard records from `table` using the built-in column candidates
pub fn extract_standard(table: &RawTable, label: &str) -> Vec<StandardRecord> {
    SchemaMapper::default().extract(table, label, None)
}
