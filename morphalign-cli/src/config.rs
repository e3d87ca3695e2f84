//! Configuration file support
//!
//! A TOML file can pin the recurring options; command-line flags always
//! win over it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options loadable from a TOML configuration file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Worker pool width
    pub threads: Option<usize>,
    /// Language of the analyzer tagset
    pub language: Option<String>,
    /// Delete analyzer output and plain-text files after successful runs
    pub clean_working_files: bool,
}

const DEFAULT_CONFIG: &str = "\
# morphalign configuration

# Worker pool width; defaults to available parallelism.
#threads = 4

# Language of the analyzer tagset; enables tag normalization.
# Bundled tables: \"en\", \"fr\".
#language = \"en\"

# Delete analyzer output and plain-text files after successful runs.
clean_working_files = false
";

impl CliConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// The commented default configuration file.
    pub fn default_toml() -> &'static str {
        DEFAULT_CONFIG
    }
}
