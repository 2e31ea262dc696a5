//! Merge per-source record sets and remove duplicates.
//!
//! Deduplication runs in two cascading tiers:
//! 1. Records with a DOI key are grouped by DOI; each group keeps one record.
//! 2. The DOI survivors plus every DOI-less record are grouped by normalized
//!    title; each group keeps one record.
//!
//! Within a group the record with the lowest source rank wins, and equal ranks
//! go to the record seen first. A record that survives the DOI tier can still
//! lose in the title tier.

use crate::models::StandardRecord;
use crate::utils::report::{compute_stats, SourceCounts};

/// Precedence used when none is configured
pub const DEFAULT_PRECEDENCE: &[&str] = &["Scopus", "IEEE Xplore", "ScienceDirect"];

/// Ordered list of source labels; earlier labels win duplicate conflicts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precedence {
    labels: Vec<String>,
}

impl Precedence {
    /// Build from labels, trimming them and dropping empty ones
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = labels
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { labels }
    }

    /// Parse a comma-separated list such as `"Scopus,IEEE Xplore,ScienceDirect"`
    pub fn parse(spec: &str) -> Self {
        Self::new(spec.split(','))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Rank of a label: its last position, or [`Self::unranked`] if absent
    pub fn rank(&self, label: &str) -> usize {
        self.labels
            .iter()
            .rposition(|l| l == label)
            .unwrap_or_else(|| self.unranked())
    }

    /// Rank given to labels missing from the list; loses to every listed label
    pub fn unranked(&self) -> usize {
        self.labels.len()
    }
}

impl Default for Precedence {
    fn default() -> Self {
        Self::new(DEFAULT_PRECEDENCE.iter())
    }
}

/// Tuning switches for the title tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupOptions {
    /// Keep every record whose normalized title is empty instead of
    /// collapsing them into a single survivor
    pub exempt_empty_titles: bool,
}

/// Counts collected around a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub input_total: usize,
    pub unique: usize,
    pub before: SourceCounts,
    pub after: SourceCounts,
}

impl MergeStats {
    pub fn removed(&self) -> usize {
        self.input_total - self.unique
    }
}

/// Deduplicated records plus statistics
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub records: Vec<StandardRecord>,
    pub stats: MergeStats,
}

/// Concatenate batches in arrival order and assign each record its source rank
pub fn concat_ranked(
    batches: impl IntoIterator<Item = Vec<StandardRecord>>,
    precedence: &Precedence,
) -> Vec<StandardRecord> {
    batches
        .into_iter()
        .flatten()
        .map(|mut record| {
            record.set_source_rank(precedence.rank(record.source()));
            record
        })
        .collect()
}

/// Merge per-source batches and deduplicate them
pub fn merge_records(
    batches: impl IntoIterator<Item = Vec<StandardRecord>>,
    precedence: &Precedence,
    options: DedupOptions,
) -> MergeOutcome {
    dedup_merged(concat_ranked(batches, precedence), options)
}

/// Deduplicate an already ranked, concatenated record set
pub fn dedup_merged(merged: Vec<StandardRecord>, options: DedupOptions) -> MergeOutcome {
    let input_total = merged.len();
    let before = compute_stats(&merged);

    let records = dedup_records(merged, options);

    let stats = MergeStats {
        input_total,
        unique: records.len(),
        before,
        after: compute_stats(&records),
    };

    tracing::debug!(
        input_total = stats.input_total,
        unique = stats.unique,
        removed = stats.removed(),
        "Deduplication finished"
    );

    MergeOutcome { records, stats }
}

/// Run both dedup tiers over ranked records.
///
/// The result is ordered by normalized title, then source rank.
pub fn dedup_records(records: Vec<StandardRecord>, options: DedupOptions) -> Vec<StandardRecord> {
    let (has_doi, no_doi): (Vec<_>, Vec<_>) = records
        .into_iter()
        .enumerate()
        .partition(|(_, r)| r.has_doi());

    let mut doi_survivors = keep_best_per_key(has_doi, |r| r.doi_norm(), false);
    // back to arrival order so title ties go to the record seen first
    doi_survivors.sort_by_key(|(arrival, _)| *arrival);

    let doi_kept = doi_survivors.len();
    let combined: Vec<_> = doi_survivors.into_iter().chain(no_doi).collect();
    let survivors = keep_best_per_key(combined, |r| r.title_norm(), options.exempt_empty_titles);

    tracing::trace!(
        doi_kept,
        survivors = survivors.len(),
        "Dedup tiers applied"
    );

    survivors.into_iter().map(|(_, r)| r).collect()
}

fn rank_of(record: &StandardRecord) -> usize {
    record.source_rank().unwrap_or(usize::MAX)
}

/// Stable sort by (key, rank) and keep the first record of each key group
fn keep_best_per_key<F>(
    mut items: Vec<(usize, StandardRecord)>,
    key: F,
    exempt_empty: bool,
) -> Vec<(usize, StandardRecord)>
where
    F: Fn(&StandardRecord) -> &str,
{
    items.sort_by(|(_, a), (_, b)| key(a).cmp(key(b)).then_with(|| rank_of(a).cmp(&rank_of(b))));
    items.dedup_by(|(_, later), (_, kept)| {
        let k = key(&*later);
        k == key(&*kept) && !(exempt_empty && k.is_empty())
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rec(source: &str, title: &str, doi: Option<&str>) -> StandardRecord {
        let builder = StandardRecord::builder(source).title(title);
        match doi {
            Some(d) => builder.doi(d).build(),
            None => builder.build(),
        }
    }

    fn untitled(source: &str, doi: Option<&str>) -> StandardRecord {
        let builder = StandardRecord::builder(source);
        match doi {
            Some(d) => builder.doi(d).build(),
            None => builder.build(),
        }
    }

    fn scopus_first() -> Precedence {
        Precedence::parse("Scopus,IEEE Xplore")
    }

    #[test]
    fn test_precedence_parse() {
        let p = Precedence::parse(" Scopus , IEEE Xplore,,ScienceDirect ,");
        assert_eq!(p.labels(), ["Scopus", "IEEE Xplore", "ScienceDirect"]);
        assert_eq!(p.rank("Scopus"), 0);
        assert_eq!(p.rank("ScienceDirect"), 2);
        assert_eq!(p.rank("Web of Science"), 3);
        assert_eq!(p.unranked(), 3);
    }

    #[test]
    fn test_repeated_label_takes_last_position() {
        let p = Precedence::parse("Scopus,IEEE Xplore,Scopus");
        assert_eq!(p.rank("Scopus"), 2);
        assert_eq!(p.rank("IEEE Xplore"), 1);
        assert_eq!(p.unranked(), 3);

        let outcome = merge_records(
            vec![
                vec![rec("Scopus", "Shared", Some("10.1234/dup"))],
                vec![rec("IEEE Xplore", "Shared", Some("10.1234/dup"))],
            ],
            &p,
            DedupOptions::default(),
        );
        assert_eq!(outcome.records[0].source(), "IEEE Xplore");
    }

    #[test]
    fn test_default_precedence() {
        let p = Precedence::default();
        assert_eq!(p.labels(), ["Scopus", "IEEE Xplore", "ScienceDirect"]);
    }

    #[test]
    fn test_doi_match_is_case_insensitive_and_respects_precedence() {
        let outcome = merge_records(
            vec![
                vec![rec("Scopus", "Foo", Some("10.1/x"))],
                vec![rec("IEEE Xplore", "Foo Bar", Some("10.1/X"))],
            ],
            &scopus_first(),
            DedupOptions::default(),
        );
        // "10.1/x" has a one-digit registrant, so it is not a DOI key;
        // the titles differ, so both survive
        assert_eq!(outcome.records.len(), 2);

        let outcome = merge_records(
            vec![
                vec![rec("IEEE Xplore", "Foo Bar", Some("10.1234/X"))],
                vec![rec("Scopus", "Foo", Some("10.1234/x"))],
            ],
            &scopus_first(),
            DedupOptions::default(),
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].source(), "Scopus");
        assert_eq!(outcome.stats.removed(), 1);
    }

    #[test]
    fn test_equal_rank_first_seen_wins() {
        let outcome = merge_records(
            vec![
                vec![rec("Unknown A", "First", Some("10.5555/same"))],
                vec![rec("Unknown B", "Second", Some("10.5555/SAME"))],
            ],
            &scopus_first(),
            DedupOptions::default(),
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].source(), "Unknown A");
    }

    #[test]
    fn test_unranked_loses_to_ranked() {
        let outcome = merge_records(
            vec![
                vec![rec("Unknown", "Title", Some("10.5555/abc"))],
                vec![rec("IEEE Xplore", "Title", Some("10.5555/abc"))],
            ],
            &scopus_first(),
            DedupOptions::default(),
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].source(), "IEEE Xplore");
    }

    #[test]
    fn test_title_match_without_doi_respects_precedence() {
        let outcome = merge_records(
            vec![
                vec![rec("ScienceDirect", "A Study of Things", None)],
                vec![rec("IEEE Xplore", "a study of things!", None)],
            ],
            &Precedence::parse("IEEE Xplore,ScienceDirect"),
            DedupOptions::default(),
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].source(), "IEEE Xplore");
    }

    #[test]
    fn test_title_tier_cascades_over_distinct_dois() {
        let outcome = merge_records(
            vec![
                vec![rec("Scopus", "Same Paper", Some("10.1234/one"))],
                vec![rec("IEEE Xplore", "Same paper.", Some("10.1234/two"))],
            ],
            &scopus_first(),
            DedupOptions::default(),
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].source(), "Scopus");
    }

    #[test]
    fn test_doi_record_beats_doiless_record_on_title_tie() {
        let outcome = merge_records(
            vec![vec![
                rec("Scopus", "Shared", None),
                rec("Scopus", "Shared", Some("10.1234/shared")),
            ]],
            &scopus_first(),
            DedupOptions::default(),
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].doi_norm(), "10.1234/shared");
    }

    #[test]
    fn test_same_source_duplicates_collapse() {
        let outcome = merge_records(
            vec![vec![
                rec("Scopus", "Repeated", None),
                rec("Scopus", "Repeated", None),
            ]],
            &scopus_first(),
            DedupOptions::default(),
        );
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn test_empty_titles_collapse_by_default() {
        let batches = vec![vec![
            untitled("Scopus", None),
            untitled("IEEE Xplore", None),
            untitled("IEEE Xplore", Some("10.1234/a")),
        ]];

        let outcome = merge_records(batches.clone(), &scopus_first(), DedupOptions::default());
        assert_eq!(outcome.records.len(), 1);

        let exempt = DedupOptions {
            exempt_empty_titles: true,
        };
        let outcome = merge_records(batches, &scopus_first(), exempt);
        assert_eq!(outcome.records.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let outcome = merge_records(Vec::new(), &Precedence::default(), DedupOptions::default());
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats, MergeStats::default());
        assert_eq!(outcome.stats.removed(), 0);
    }

    #[test]
    fn test_output_sorted_by_title() {
        let outcome = merge_records(
            vec![vec![
                rec("Scopus", "Zeta", None),
                rec("Scopus", "alpha", None),
                rec("Scopus", "Mu", Some("10.1234/mu")),
            ]],
            &scopus_first(),
            DedupOptions::default(),
        );
        let titles: Vec<_> = outcome.records.iter().map(|r| r.title_norm()).collect();
        assert_eq!(titles, ["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_stats_before_and_after() {
        let outcome = merge_records(
            vec![
                vec![
                    rec("Scopus", "One", Some("10.1234/one")),
                    rec("Scopus", "Two", None),
                ],
                vec![
                    rec("IEEE Xplore", "One", Some("10.1234/ONE")),
                    rec("IEEE Xplore", "Three", None),
                ],
            ],
            &scopus_first(),
            DedupOptions::default(),
        );

        let stats = &outcome.stats;
        assert_eq!(stats.input_total, 4);
        assert_eq!(stats.unique, 3);
        assert_eq!(stats.removed(), 1);
        assert_eq!(stats.before.get("Scopus"), 2);
        assert_eq!(stats.before.get("IEEE Xplore"), 2);
        assert_eq!(stats.after.get("Scopus"), 2);
        assert_eq!(stats.after.get("IEEE Xplore"), 1);
    }

    #[test]
    fn test_survivor_keys_are_unique() {
        let batches = vec![
            vec![
                rec("Scopus", "Graph Networks", Some("10.1000/g1")),
                rec("Scopus", "Transformers", Some("10.1000/t1")),
                rec("Scopus", "", None),
            ],
            vec![
                rec("IEEE Xplore", "graph networks", Some("10.1000/G2")),
                rec("IEEE Xplore", "Transformers!", None),
                rec("IEEE Xplore", "Diffusion", Some("10.1000/t1")),
            ],
            vec![
                rec("ScienceDirect", "Diffusion", None),
                rec("ScienceDirect", "", None),
                rec("ScienceDirect", "Kernels", Some("https://doi.org/10.1000/K1.")),
            ],
        ];
        let outcome = merge_records(batches, &Precedence::default(), DedupOptions::default());

        let mut dois = HashSet::new();
        let mut titles = HashSet::new();
        for r in &outcome.records {
            if r.has_doi() {
                assert!(dois.insert(r.doi_norm().to_string()), "duplicate DOI survived");
            }
            assert!(titles.insert(r.title_norm().to_string()), "duplicate title survived");
        }
        assert_eq!(outcome.stats.after.total(), outcome.records.len());
    }
}
