//! Standard record model shared by every input source.

use serde::{Deserialize, Serialize};

use crate::utils::{norm_doi, norm_title};

/// A bibliographic record in the uniform shape produced by the schema mapper.
///
/// The comparison keys (`title_norm`, `doi_norm`) are derived from `title` and
/// `doi` when the record is built and cannot be changed on their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardRecord {
    source: String,
    title: Option<String>,
    authors: Option<String>,
    year: Option<String>,
    doi: Option<String>,
    url: Option<String>,
    title_norm: String,
    doi_norm: String,
    source_rank: Option<usize>,
    origin_file: Option<String>,
}

impl StandardRecord {
    /// Start building a record for the given source label
    pub fn builder(source: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(source)
    }

    /// Origin database label
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn authors(&self) -> Option<&str> {
        self.authors.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Normalized title key (empty when the title is absent or has no word characters)
    pub fn title_norm(&self) -> &str {
        &self.title_norm
    }

    /// Normalized DOI key (empty when no DOI could be extracted)
    pub fn doi_norm(&self) -> &str {
        &self.doi_norm
    }

    /// Whether this record carries a usable DOI key
    pub fn has_doi(&self) -> bool {
        !self.doi_norm.is_empty()
    }

    /// Precedence rank assigned by the merge engine; lower wins
    pub fn source_rank(&self) -> Option<usize> {
        self.source_rank
    }

    /// File name of the export this record was read from
    pub fn origin_file(&self) -> Option<&str> {
        self.origin_file.as_deref()
    }

    pub(crate) fn set_source_rank(&mut self, rank: usize) {
        self.source_rank = Some(rank);
    }

    /// Project the record onto the public output columns
    pub fn to_output_row(&self) -> OutputRow {
        OutputRow {
            source: self.source.clone(),
            title: self.title.clone(),
            authors: self.authors.clone(),
            year: self.year.clone(),
            doi: self.doi.clone(),
            url: self.url.clone(),
        }
    }
}

/// One row of the deduplicated output file.
///
/// Field order defines the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub source: String,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
}

/// Column names of the output file, in order
pub const OUTPUT_COLUMNS: [&str; 6] = ["source", "title", "authors", "year", "doi", "url"];

/// Builder for constructing StandardRecord objects
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    source: String,
    title: Option<String>,
    authors: Option<String>,
    year: Option<String>,
    doi: Option<String>,
    url: Option<String>,
    origin_file: Option<String>,
}

impl RecordBuilder {
    /// Create a new builder with the required source label
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: None,
            authors: None,
            year: None,
            doi: None,
            url: None,
            origin_file: None,
        }
    }

    /// Set title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set title from an optional cell value
    pub fn maybe_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Set authors
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    pub fn maybe_authors(mut self, authors: Option<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set publication year
    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn maybe_year(mut self, year: Option<String>) -> Self {
        self.year = year;
        self
    }

    /// Set DOI
    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn maybe_doi(mut self, doi: Option<String>) -> Self {
        self.doi = doi;
        self
    }

    /// Set URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn maybe_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Set the name of the file the record came from
    pub fn origin_file(mut self, name: impl Into<String>) -> Self {
        self.origin_file = Some(name.into());
        self
    }

    /// Build the record, deriving its comparison keys
    pub fn build(self) -> StandardRecord {
        let title_norm = self.title.as_deref().map(norm_title).unwrap_or_default();
        let doi_norm = self.doi.as_deref().map(norm_doi).unwrap_or_default();

        StandardRecord {
            source: self.source,
            title: self.title,
            authors: self.authors,
            year: self.year,
            doi: self.doi,
            url: self.url,
            title_norm,
            doi_norm,
            source_rank: None,
            origin_file: self.origin_file,
        }
    }
}
