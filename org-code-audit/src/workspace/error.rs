//! Workspace error types.

use thiserror::Error;

/// Errors raised by the checkout collaborator.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The clone URL could not be parsed or authenticated.
    #[error("Invalid clone URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The version-control client could not be started.
    #[error("Failed to execute git: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// The requested branch does not exist on the remote.
    ///
    /// Also raised for repositories without commits, which have no branches.
    #[error("Remote branch '{branch}' not found")]
    BranchNotFound { branch: String },

    /// The version-control client reported a failure.
    #[error("git clone failed: {message}")]
    Failed { message: String },
}

/// Errors that make a repository unavailable for scanning.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The temporary directory could not be created.
    #[error("Failed to create working directory: {source}")]
    TempDir {
        #[source]
        source: std::io::Error,
    },

    /// The checkout failed.
    #[error("Failed to check out '{repository}' at '{branch}': {source}")]
    Checkout {
        repository: String,
        branch: String,
        #[source]
        source: CheckoutError,
    },

    /// The checkout did not finish in time.
    #[error("Checkout of '{repository}' timed out after {timeout_secs} seconds")]
    Timeout {
        repository: String,
        timeout_secs: u64,
    },

    /// The working copy could not be deleted.
    #[error("Failed to remove working copy '{path}': {source}")]
    Cleanup {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    /// Returns true if the checkout failed because the branch does not exist.
    #[must_use]
    pub fn is_missing_branch(&self) -> bool {
        matches!(
            self,
            Self::Checkout {
                source: CheckoutError::BranchNotFound { .. },
                ..
            }
        )
    }
}
