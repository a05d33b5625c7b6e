//! Optional YAML configuration for the `optscan` binary.
//!
//! Every field is a default that the matching command-line flag overrides.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! tool: git
//! help_file: docs/git.help
//! allowed_groups:
//!   - remote add
//! format: table
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::output::OutputFormat;

pub const CONFIG_VERSION: &str = "1.0";

/// Errors from reading or writing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported config version '{0}' (expected {CONFIG_VERSION})")]
    UnsupportedVersion(String),
}

/// Defaults for the `optscan` subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Configuration format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Tool whose level-1 header opens the help document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Help text file written in the option DSL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_file: Option<PathBuf>,
    /// Group tags allowed when scanning (empty = the scanned command's own).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_groups: Vec<String>,
    /// Report format for `parse`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            tool: None,
            help_file: None,
            allowed_groups: Vec::new(),
            format: None,
        }
    }
}

impl ScanConfig {
    /// Loads configuration from a YAML file.
    ///
    /// A relative `help_file` is resolved against the config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: ScanConfig = serde_yaml::from_reader(reader)?;
        if config.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        if let Some(base) = path.parent() {
            config.help_file = config.help_file.map(|file| {
                if file.is_relative() {
                    base.join(file)
                } else {
                    file
                }
            });
        }
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
