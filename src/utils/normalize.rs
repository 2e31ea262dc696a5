//! Canonical comparison keys for DOIs and titles.
//!
//! Both functions are total: any input, including an empty string, yields a
//! key, and an empty key means "nothing usable to compare on".

use regex::Regex;
use std::sync::OnceLock;

/// Resolver prefixes removed before DOI extraction
const DOI_RESOLVER_PREFIXES: [&str; 2] = ["https://doi.org/", "http://doi.org/"];

/// Characters trimmed from the tail of an extracted DOI
const DOI_TRAILING_JUNK: &[char] = &['.', ',', ';', ')'];

static DOI_REGEX: OnceLock<Regex> = OnceLock::new();
static NON_WORD_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn doi_regex() -> &'static Regex {
    DOI_REGEX.get_or_init(|| Regex::new(r"10\.\d{4,9}/\S+").expect("valid DOI pattern"))
}

fn non_word_regex() -> &'static Regex {
    NON_WORD_REGEX.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_\s]").expect("valid non-word pattern"))
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Normalize a DOI for comparison.
///
/// Lowercases, drops `doi.org` resolver prefixes and surrounding periods, then
/// extracts the first `10.<registrant>/<suffix>` run. Returns an empty string
/// when no DOI can be found.
///
/// # Examples
///
/// ```
/// use bib_merge::utils::norm_doi;
///
/// assert_eq!(norm_doi("https://doi.org/10.1109/ABC.2020.123."), "10.1109/abc.2020.123");
/// assert_eq!(norm_doi("no doi here"), "");
/// ```
pub fn norm_doi(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase();
    // removing one prefix can splice together another
    while let Some(prefix) = DOI_RESOLVER_PREFIXES.iter().find(|p| s.contains(*p)) {
        s = s.replace(*prefix, "");
    }
    let s = s.trim().trim_matches('.');

    doi_regex()
        .find(s)
        .map(|m| m.as_str().trim_end_matches(DOI_TRAILING_JUNK))
        // a suffix made only of trailing junk leaves no DOI
        .filter(|doi| doi.split_once('/').is_some_and(|(_, suffix)| !suffix.is_empty()))
        .map(str::to_string)
        .unwrap_or_default()
}

/// Normalize a title for comparison.
///
/// Lowercases, turns every character other than letters, numbers, underscore
/// and whitespace into a space, then collapses whitespace runs. Numbers include
/// superscripts and other non-decimal digits; combining marks and connector
/// punctuation other than `_` become spaces.
///
/// # Examples
///
/// ```
/// use bib_merge::utils::norm_title;
///
/// assert_eq!(norm_title("Deep Learning, A Survey!"), norm_title("deep   learning a survey"));
/// ```
pub fn norm_title(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let spaced = non_word_regex().replace_all(&lowered, " ");
    whitespace_regex()
        .replace_all(&spaced, " ")
        .trim()
        .to_string()
}
