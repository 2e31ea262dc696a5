//! End-to-end merge run: read exports, deduplicate, write the merged list.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::error::Result;
use crate::io::{read_table, write_records};
use crate::models::StandardRecord;
use crate::schema::{ColumnCandidates, SchemaMapper};
use crate::utils::{
    concat_ranked, counts_table, dedup_merged, overlaps_by_title, overlaps_table, DedupOptions,
    MergeStats, Overlaps, Precedence,
};

/// One `Label:path` input argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub label: String,
    pub path: PathBuf,
}

/// Reasons an input argument is skipped
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputSpecError {
    #[error("input without label, skipping: {0}")]
    MissingLabel(String),
}

impl InputSpec {
    /// Split at the first colon; label and path are trimmed
    pub fn parse(spec: &str) -> std::result::Result<Self, InputSpecError> {
        let (label, path) = spec
            .split_once(':')
            .ok_or_else(|| InputSpecError::MissingLabel(spec.to_string()))?;

        Ok(Self {
            label: label.trim().to_string(),
            path: PathBuf::from(path.trim()),
        })
    }

    /// File name used to tag records from this input
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

impl FromStr for InputSpec {
    type Err = InputSpecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse every input argument, warning about and skipping malformed ones
pub fn parse_inputs<S: AsRef<str>>(specs: &[S]) -> Vec<InputSpec> {
    specs
        .iter()
        .filter_map(|spec| match InputSpec::parse(spec.as_ref()) {
            Ok(input) => Some(input),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        })
        .collect()
}

/// Everything a run needs
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub inputs: Vec<InputSpec>,
    pub output: PathBuf,
    pub precedence: Precedence,
    pub dedup: DedupOptions,
    pub columns: ColumnCandidates,
    pub delimiter: u8,
}

impl RunOptions {
    /// Options with default precedence, columns and a comma delimiter
    pub fn new(inputs: Vec<InputSpec>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output: output.into(),
            precedence: Precedence::default(),
            dedup: DedupOptions::default(),
            columns: ColumnCandidates::default(),
            delimiter: b',',
        }
    }
}

/// Statistics of a finished run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub stats: MergeStats,
    /// Pairwise title overlaps over the records before deduplication
    pub overlaps: Overlaps,
}

impl RunReport {
    pub fn summary_line(&self) -> String {
        format!(
            "Input total: {} | Unique: {} | Removed: {}",
            self.stats.input_total,
            self.stats.unique,
            self.stats.removed()
        )
    }

    /// Display adapter for the text printed after a run
    pub fn display(&self, detailed: bool) -> ReportDisplay<'_> {
        ReportDisplay {
            report: self,
            detailed,
        }
    }

    /// Text printed after a run; `detailed` adds tables and pairwise overlaps
    pub fn render(&self, detailed: bool) -> String {
        self.display(detailed).to_string()
    }
}

/// Formats a [`RunReport`], optionally with tables and pairwise overlaps
pub struct ReportDisplay<'a> {
    report: &'a RunReport,
    detailed: bool,
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.report.stats;
        writeln!(f, "{}", self.report.summary_line())?;
        writeln!(f, "Per-source before: {}", stats.before)?;
        writeln!(f, "Per-source after: {}", stats.after)?;

        if self.detailed {
            let overlaps = &self.report.overlaps;
            writeln!(f)?;
            writeln!(f, "{}", counts_table(&stats.before, &stats.after))?;
            writeln!(f, "Pairwise title overlaps: {}", overlaps)?;
            if !overlaps.is_empty() {
                writeln!(f, "{}", overlaps_table(overlaps))?;
            }
        }
        Ok(())
    }
}

/// Read every input and map it onto standard records, one batch per input
pub fn load_inputs(
    inputs: &[InputSpec],
    mapper: &SchemaMapper,
    delimiter: u8,
) -> Result<Vec<Vec<StandardRecord>>> {
    inputs
        .iter()
        .map(|input| {
            let table = read_table(&input.path, delimiter)?;
            let records = mapper.extract(&table, &input.label, input.file_name().as_deref());
            tracing::debug!(
                source = %input.label,
                path = %input.path.display(),
                records = records.len(),
                "Loaded input"
            );
            Ok(records)
        })
        .collect()
}

/// Run a full merge and write the deduplicated output file
pub fn run(options: &RunOptions) -> Result<RunReport> {
    let mapper = SchemaMapper::new(options.columns.clone());
    let batches = load_inputs(&options.inputs, &mapper, options.delimiter)?;

    let merged = concat_ranked(batches, &options.precedence);
    let overlaps = overlaps_by_title(&merged);
    let outcome = dedup_merged(merged, options.dedup);

    write_records(&options.output, &outcome.records, options.delimiter)?;

    tracing::info!(
        inputs = options.inputs.len(),
        input_total = outcome.stats.input_total,
        unique = outcome.stats.unique,
        output = %options.output.display(),
        "Merge complete"
    );

    Ok(RunReport {
        stats: outcome.stats,
        overlaps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_spec_parse() {
        let spec = InputSpec::parse("IEEE Xplore: /raw/ieee.csv").unwrap();
        assert_eq!(spec.label, "IEEE Xplore");
        assert_eq!(spec.path, PathBuf::from("/raw/ieee.csv"));
        assert_eq!(spec.file_name().as_deref(), Some("ieee.csv"));
    }

    #[test]
    fn test_input_spec_splits_at_first_colon() {
        let spec: InputSpec = "Scopus:C:/data/scopus.csv".parse().unwrap();
        assert_eq!(spec.label, "Scopus");
        assert_eq!(spec.path, PathBuf::from("C:/data/scopus.csv"));
    }

    #[test]
    fn test_input_spec_without_colon() {
        assert_eq!(
            InputSpec::parse("/raw/scopus.csv"),
            Err(InputSpecError::MissingLabel("/raw/scopus.csv".to_string()))
        );
    }

    #[test]
    fn test_parse_inputs_skips_malformed() {
        let inputs = parse_inputs(&["Scopus:/a.csv", "no-label.csv", "IEEE Xplore:/b.csv"]);
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].label, "Scopus");
        assert_eq!(inputs[1].label, "IEEE Xplore");
    }

    #[test]
    fn test_render_summary_only() {
        let report = RunReport::default();
        let text = report.render(false);
        assert!(text.starts_with("Input total: 0 | Unique: 0 | Removed: 0\n"));
        assert!(text.contains("Per-source before: {}"));
        assert!(!text.contains("Pairwise"));
    }

    #[test]
    fn test_render_detailed_includes_overlaps() {
        let report = RunReport::default();
        assert!(report.render(true).contains("Pairwise title overlaps: {}"));
    }

    #[test]
    fn test_display_matches_render() {
        let report = RunReport::default();
        assert_eq!(format!("{}", report.display(true)), report.render(true));
        assert_eq!(report.display(false).to_string(), report.render(false));
    }
}
