//! Optional `audit.toml` configuration file.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from a TOML configuration file.
///
/// Every field is optional; command-line values take precedence.
///
/// ```toml
/// organization = "acme"
/// file-patterns = ["*.tf", ".github/workflows/*.yml"]
/// content-patterns = ["TODO:"]
/// limit = 25
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AuditFile {
    /// GitHub organization to scan.
    pub organization: Option<String>,

    /// Glob patterns selecting files.
    #[serde(default)]
    pub file_patterns: Vec<String>,

    /// Substrings searched for inside selected files.
    #[serde(default)]
    pub content_patterns: Vec<String>,

    /// Branch to check out instead of the default branch.
    pub branch: Option<String>,

    /// Maximum number of repositories to scan.
    pub limit: Option<usize>,

    /// Number of repositories scanned at once.
    pub concurrency: Option<usize>,

    /// Seconds allowed for a single checkout.
    pub checkout_timeout_secs: Option<u64>,

    /// Keep working copies after scanning.
    #[serde(default)]
    pub keep_clones: bool,

    /// Directory in which working copies are created.
    pub clone_root: Option<PathBuf>,

    /// Path to the inclusion list.
    pub inclusions_file: Option<PathBuf>,

    /// Path to the exclusion list.
    pub exclusions_file: Option<PathBuf>,

    /// Report output path.
    pub output: Option<PathBuf>,

    /// Report format (`csv` or `json`).
    pub format: Option<String>,
}

impl AuditFile {
    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, or not valid TOML
    /// for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
