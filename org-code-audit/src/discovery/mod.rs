//! Repository discovery and candidate selection.
//!
//! [`RepositorySource`] is the seam to the hosted-git API. [`GitHubSource`]
//! implements it with octocrab; tests substitute in-memory listings.
//! [`select_candidates`] turns a listing into the ordered candidate list.

mod error;
mod github;
mod rate_limit;
mod repository;
mod selector;

pub use error::DiscoveryError;
pub use github::GitHubSource;
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, RateLimitInfo};
pub use repository::RepositoryRef;
pub use selector::select_candidates;

use std::future::Future;

/// Lists the repositories of an organization.
pub trait RepositorySource: Send + Sync {
    /// Returns every repository of `organization`, in the order the source
    /// reports them.
    fn list_repositories(
        &self,
        organization: &str,
    ) -> impl Future<Output = Result<Vec<RepositoryRef>, DiscoveryError>> + Send;
}
