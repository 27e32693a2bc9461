//! Runner configuration.

use crate::config::{validate_organization, ConfigError, RepoSelection, ScanConfig};
use crate::workspace::DEFAULT_CHECKOUT_TIMEOUT;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Repositories processed at the same time unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Configuration for auditing one organization.
#[derive(Clone)]
pub struct RunnerConfig {
    /// Organization whose repositories are audited.
    organization: String,
    /// GitHub token used for listing and checkouts.
    token: String,
    /// Patterns and checkout options.
    scan: ScanConfig,
    /// Inclusion and exclusion lists.
    selection: RepoSelection,
    /// Maximum repositories processed at once.
    concurrency: usize,
    /// Bound on a single checkout.
    checkout_timeout: Duration,
    /// Parent directory for working copies.
    clone_root: Option<PathBuf>,
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("organization", &self.organization)
            .field("token", &"<redacted>")
            .field("scan", &self.scan)
            .field("selection", &self.selection)
            .field("concurrency", &self.concurrency)
            .field("checkout_timeout", &self.checkout_timeout)
            .field("clone_root", &self.clone_root)
            .finish()
    }
}

impl RunnerConfig {
    /// Creates a configuration with default selection, concurrency and timeout.
    pub fn new(organization: impl Into<String>, token: impl Into<String>, scan: ScanConfig) -> Self {
        Self {
            organization: organization.into(),
            token: token.into(),
            scan,
            selection: RepoSelection::default(),
            concurrency: DEFAULT_CONCURRENCY,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
            clone_root: None,
        }
    }

    /// Sets the inclusion and exclusion lists.
    #[must_use]
    pub fn with_selection(mut self, selection: RepoSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the number of repositories processed at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the checkout timeout.
    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Places working copies under `clone_root`.
    #[must_use]
    pub fn with_clone_root(mut self, clone_root: Option<PathBuf>) -> Self {
        self.clone_root = clone_root;
        self
    }

    /// Returns the organization name.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the scan configuration.
    pub fn scan(&self) -> &ScanConfig {
        &self.scan
    }

    /// Returns the inclusion and exclusion lists.
    pub fn selection(&self) -> &RepoSelection {
        &self.selection
    }

    /// Returns the max repositories processed at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the checkout timeout.
    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }

    /// Returns the working-copy parent directory, if set.
    pub fn clone_root(&self) -> Option<&Path> {
        self.clone_root.as_deref()
    }

    /// Checks the settings not covered by [`ScanConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid organization, zero concurrency
    /// or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_organization(&self.organization)?;
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                message: "must be a positive integer".to_string(),
            });
        }
        if self.checkout_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "checkout-timeout-secs",
                message: "must be a positive number of seconds".to_string(),
            });
        }
        Ok(())
    }
}
