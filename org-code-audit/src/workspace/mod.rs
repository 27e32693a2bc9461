//! Transient working copies.
//!
//! [`WorkspaceManager::acquire`] checks a repository out into a fresh,
//! uniquely named temporary directory. The returned [`WorkingCopy`] owns
//! that directory: releasing or dropping it deletes the tree, unless
//! retention was requested, in which case the path is kept and reported.

mod checkout;
mod error;

pub use checkout::{Checkout, GitCheckout};
pub use error::{CheckoutError, WorkspaceError};

use crate::discovery::RepositoryRef;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Default bound on a single checkout.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(300);

/// Prefix of every working-copy directory name.
const DIR_PREFIX: &str = "org-code-audit-";

/// Creates and releases working copies.
#[derive(Debug, Clone)]
pub struct WorkspaceManager<C> {
    checkout: C,
    clone_root: Option<PathBuf>,
    timeout: Duration,
    retain: bool,
}

impl<C: Checkout> WorkspaceManager<C> {
    /// Creates a manager that checks out into the system temp directory.
    pub fn new(checkout: C) -> Self {
        Self {
            checkout,
            clone_root: None,
            timeout: DEFAULT_CHECKOUT_TIMEOUT,
            retain: false,
        }
    }

    /// Creates working copies under `clone_root` instead of the system temp directory.
    #[must_use]
    pub fn with_clone_root(mut self, clone_root: PathBuf) -> Self {
        self.clone_root = Some(clone_root);
        self
    }

    /// Sets the checkout timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Keeps working copies on disk after release.
    #[must_use]
    pub fn with_retention(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    /// Checks out `branch` of `repository`, or its default branch when `branch` is `None`.
    ///
    /// On failure the temporary directory is removed before returning.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] if the directory cannot be created, the
    /// checkout fails, or the checkout exceeds the timeout.
    pub async fn acquire(
        &self,
        repository: &RepositoryRef,
        branch: Option<&str>,
    ) -> Result<WorkingCopy, WorkspaceError> {
        let branch = branch.unwrap_or(repository.default_branch.as_str());
        let dir = self.create_dir(&repository.name)?;
        let root = dir.path().to_path_buf();

        debug!(repo = %repository.name, branch, path = %root.display(), "Acquiring working copy");

        let checkout = self.checkout.checkout(&repository.clone_url, branch, &root);
        let outcome = tokio::time::timeout(self.timeout, checkout).await;

        match outcome {
            Ok(Ok(())) => Ok(WorkingCopy {
                repository: repository.clone(),
                dir: Some(dir),
                root,
                retain: self.retain,
            }),
            Ok(Err(e)) => Err(WorkspaceError::Checkout {
                repository: repository.name.clone(),
                branch: branch.to_string(),
                source: e,
            }),
            Err(_) => Err(WorkspaceError::Timeout {
                repository: repository.name.clone(),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }

    /// Releases a working copy. Returns the kept path when retention is on.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Cleanup`] if the tree cannot be deleted.
    pub fn release(&self, copy: WorkingCopy) -> Result<Option<PathBuf>, WorkspaceError> {
        copy.release()
    }

    fn create_dir(&self, name: &str) -> Result<TempDir, WorkspaceError> {
        let prefix = format!("{DIR_PREFIX}{name}-");
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match &self.clone_root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| WorkspaceError::TempDir { source: e })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };
        dir.map_err(|e| WorkspaceError::TempDir { source: e })
    }
}

/// A checked-out repository owned by one scan.
///
/// Dropping an unreleased copy applies the same policy as
/// [`WorkingCopy::release`], so early returns and panics never leak a tree.
#[derive(Debug)]
pub struct WorkingCopy {
    repository: RepositoryRef,
    dir: Option<TempDir>,
    root: PathBuf,
    retain: bool,
}

impl WorkingCopy {
    /// Returns the repository this copy was checked out from.
    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    /// Returns the root of the checkout.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true until the copy is released.
    pub fn is_acquired(&self) -> bool {
        self.dir.is_some()
    }

    /// Deletes the checkout, or keeps it and returns its path when retention is on.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Cleanup`] if the tree cannot be deleted.
    pub fn release(mut self) -> Result<Option<PathBuf>, WorkspaceError> {
        let Some(dir) = self.dir.take() else {
            return Ok(None);
        };

        if self.retain {
            let path = dir.keep();
            info!(repo = %self.repository.name, path = %path.display(), "Retained working copy");
            return Ok(Some(path));
        }

        dir.close().map_err(|e| WorkspaceError::Cleanup {
            path: self.root.display().to_string(),
            source: e,
        })?;
        debug!(repo = %self.repository.name, "Removed working copy");
        Ok(None)
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        if self.retain {
            let path = dir.keep();
            warn!(repo = %self.repository.name, path = %path.display(), "Retained working copy of interrupted scan");
        } else {
            warn!(repo = %self.repository.name, "Removing working copy of interrupted scan");
            drop(dir);
        }
    }
}
