//! Per-source counts and pairwise title overlaps for run diagnostics.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use comfy_table::{presets, Cell, CellAlignment, Table};

use crate::models::StandardRecord;

/// Number of records per source label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCounts {
    counts: BTreeMap<String, usize>,
}

impl SourceCounts {
    /// Count for a label, zero if it never appeared
    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Sum over all labels
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Labels with their counts, largest count first, then by label
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for SourceCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .ranked()
            .into_iter()
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Count records per source label
pub fn compute_stats(records: &[StandardRecord]) -> SourceCounts {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.source().to_string()).or_insert(0) += 1;
    }
    SourceCounts { counts }
}

/// Shared distinct normalized titles for every unordered pair of sources.
///
/// Keys are ordered so that the first label sorts before the second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlaps {
    pairs: BTreeMap<(String, String), usize>,
}

impl Overlaps {
    /// Overlap between two labels, in either order
    pub fn get(&self, a: &str, b: &str) -> Option<usize> {
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        self.pairs.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.pairs
            .iter()
            .map(|((a, b), n)| (a.as_str(), b.as_str(), *n))
    }
}

impl fmt::Display for Overlaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(a, b, n)| format!("({}, {}): {}", a, b, n))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Count distinct normalized titles shared by each pair of sources.
///
/// Meant for the pre-dedup record set; empty title keys count like any other.
pub fn overlaps_by_title(records: &[StandardRecord]) -> Overlaps {
    let mut titles: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for record in records {
        titles
            .entry(record.source())
            .or_default()
            .insert(record.title_norm());
    }

    let sources: Vec<_> = titles.keys().copied().collect();
    let mut pairs = BTreeMap::new();
    for (i, a) in sources.iter().enumerate() {
        for b in &sources[i + 1..] {
            let shared = titles[a].intersection(&titles[b]).count();
            pairs.insert((a.to_string(), b.to_string()), shared);
        }
    }

    Overlaps { pairs }
}

/// Side-by-side per-source counts before and after deduplication
pub fn counts_table(before: &SourceCounts, after: &SourceCounts) -> Table {
    let labels: BTreeSet<&str> = before.iter().chain(after.iter()).map(|(l, _)| l).collect();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["Source", "Before", "After", "Removed"]);

    for label in labels {
        let (b, a) = (before.get(label), after.get(label));
        table.add_row(vec![
            Cell::new(label),
            Cell::new(b).set_alignment(CellAlignment::Right),
            Cell::new(a).set_alignment(CellAlignment::Right),
            Cell::new(b.saturating_sub(a)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Pairwise title overlaps as a table
pub fn overlaps_table(overlaps: &Overlaps) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec!["Source A", "Source B", "Shared titles"]);

    for (a, b, n) in overlaps.iter() {
        table.add_row(vec![
            Cell::new(a),
            Cell::new(b),
            Cell::new(n).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
