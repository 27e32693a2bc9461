//! Immutable scan configuration.

use crate::config::ConfigError;
use crate::matcher::{ContentPatterns, FilePatterns};
use bstr::ByteSlice;

/// What to look for and how to check repositories out.
///
/// Built once per run through [`ScanConfigBuilder`]; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    file_patterns: FilePatterns,
    content_patterns: ContentPatterns,
    branch: Option<String>,
    limit: Option<usize>,
    retain_working_copies: bool,
}

impl ScanConfig {
    /// Starts building a configuration.
    #[must_use]
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Returns the compiled file globs.
    pub fn file_patterns(&self) -> &FilePatterns {
        &self.file_patterns
    }

    /// Returns the content substrings.
    pub fn content_patterns(&self) -> &ContentPatterns {
        &self.content_patterns
    }

    /// Returns the branch to check out, if one overrides the default branch.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Returns the maximum number of repositories to scan.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns whether working copies are kept after scanning.
    pub fn retain_working_copies(&self) -> bool {
        self.retain_working_copies
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    file_patterns: Vec<String>,
    content_patterns: Vec<String>,
    branch: Option<String>,
    limit: Option<usize>,
    retain_working_copies: bool,
}

impl ScanConfigBuilder {
    /// Sets the file globs.
    pub fn file_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the content substrings.
    pub fn content_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the branch to check out instead of each repository's default branch.
    pub fn branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    /// Caps the number of repositories scanned.
    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Keeps working copies on disk after scanning.
    pub fn retain_working_copies(mut self, retain: bool) -> Self {
        self.retain_working_copies = retain;
        self
    }

    /// Validates the settings and compiles the patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no file pattern is given, a glob is invalid,
    /// the branch is not a valid reference name, or the limit is zero.
    pub fn build(self) -> Result<ScanConfig, ConfigError> {
        let file_patterns = FilePatterns::compile(&self.file_patterns)?;
        if file_patterns.is_empty() {
            return Err(ConfigError::NoFilePatterns);
        }

        let branch = match self.branch.map(|b| b.trim().to_string()) {
            Some(b) if b.is_empty() => None,
            Some(b) => {
                validate_branch(&b)?;
                Some(b)
            }
            None => None,
        };

        if self.limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "limit",
                message: "must be a positive integer".to_string(),
            });
        }

        Ok(ScanConfig {
            file_patterns,
            content_patterns: ContentPatterns::new(&self.content_patterns),
            branch,
            limit: self.limit,
            retain_working_copies: self.retain_working_copies,
        })
    }
}

/// Checks that a branch name is a valid partial git reference name.
fn validate_branch(branch: &str) -> Result<(), ConfigError> {
    gix_validate::reference::name_partial(branch.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidBranch {
            branch: branch.to_string(),
            message: e.to_string(),
        })
}
