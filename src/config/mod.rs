//! Configuration management.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::MergeError;
use crate::schema::ColumnCandidates;
use crate::utils::{DedupOptions, Precedence, DEFAULT_PRECEDENCE};

/// Environment variable prefix, e.g. `BIB_MERGE_DEDUP__EXEMPT_EMPTY_TITLES=true`
pub const ENV_PREFIX: &str = "BIB_MERGE";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "bib-merge.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Duplicate resolution settings
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Extra column-name candidates per field
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Input/output file format
    #[serde(default)]
    pub input: InputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), MergeError> {
        self.input.delimiter_byte().map(|_| ())
    }
}

/// Duplicate resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Source labels in order of preference
    #[serde(default = "default_precedence")]
    pub precedence: Vec<String>,

    /// Keep all records with an empty normalized title
    #[serde(default)]
    pub exempt_empty_titles: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            precedence: default_precedence(),
            exempt_empty_titles: false,
        }
    }
}

impl DedupConfig {
    pub fn precedence(&self) -> Precedence {
        Precedence::new(&self.precedence)
    }

    pub fn options(&self) -> DedupOptions {
        DedupOptions {
            exempt_empty_titles: self.exempt_empty_titles,
        }
    }
}

fn default_precedence() -> Vec<String> {
    DEFAULT_PRECEDENCE.iter().map(|s| s.to_string()).collect()
}

/// Additional column candidates, tried after the built-in ones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
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

impl ColumnsConfig {
    /// Built-in candidates extended with the configured ones
    pub fn candidates(&self) -> ColumnCandidates {
        ColumnCandidates::default().extend(&ColumnCandidates {
            title: self.title.clone(),
            authors: self.authors.clone(),
            year: self.year.clone(),
            doi: self.doi.clone(),
            url: self.url.clone(),
        })
    }
}

/// File format configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Single-byte field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl InputConfig {
    /// Delimiter as a byte; `\t` is accepted for tab
    pub fn delimiter_byte(&self) -> Result<u8, MergeError> {
        match self.delimiter.as_str() {
            "\\t" | "\t" => Ok(b'\t'),
            d if d.len() == 1 && d.is_ascii() => Ok(d.as_bytes()[0]),
            d => Err(MergeError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                d
            ))),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, anything else for plain text
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from an optional file plus `BIB_MERGE_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config, MergeError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dedup.precedence")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| MergeError::Config(e.to_string()))?;

    let config: Config = settings
        .try_deserialize()
        .map_err(|e| MergeError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Find a configuration file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("bib-merge").join("config.toml"))
        .filter(|p| p.is_file())
}
