//! Configuration file support for bib-merge.
//!
//! # Configuration File Format
//!
//! ```toml
//! [dedup]
//! precedence = ["Scopus", "IEEE Xplore", "ScienceDirect"]
//! exempt_empty_titles = false
//!
//! [columns]
//! title = ["Paper Name"]
//! doi = ["Identifier"]
//!
//! [input]
//! delimiter = ","
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::Path;

use super::Config;

/// Reads and writes [`Config`] as TOML, without environment overrides
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Config, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Write the default configuration, refusing to overwrite an existing file
    pub fn create_default(path: &Path) -> Result<(), ConfigFileError> {
        if path.exists() {
            return Err(ConfigFileError::Io(format!(
                "{} already exists",
                path.display()
            )));
        }
        Self::save(&Config::default(), path)
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
