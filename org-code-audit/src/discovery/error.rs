//! Repository discovery error types.

use thiserror::Error;

/// Errors that can occur while listing an organization's repositories.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The organization does not exist or the token cannot see it.
    #[error("Organization '{organization}' not found or not accessible")]
    OrganizationNotFound { organization: String },
}
