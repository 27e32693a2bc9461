//! Orchestrates an organization audit.
//!
//! A run lists the organization, selects candidates, then processes each
//! candidate as an independent unit (acquire, scan, release) with at most
//! `concurrency` units in flight. Units complete in any order; outcomes are
//! put back into candidate order before aggregation.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_CONCURRENCY};
pub use error::RunnerError;

use crate::discovery::{select_candidates, GitHubSource, RepositoryRef, RepositorySource};
use crate::matcher::PatternMatcher;
use crate::summary::{Aggregator, RepoOutcome, ScanResult};
use crate::workspace::{Checkout, GitCheckout, WorkspaceManager};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// Runs an audit against a repository source and checkout collaborator.
pub struct Runner<S, C> {
    config: RunnerConfig,
    source: S,
    workspace: WorkspaceManager<C>,
    matcher: Arc<PatternMatcher>,
}

impl Runner<GitHubSource, GitCheckout> {
    /// Builds a runner that lists through the GitHub API and checks out with `git`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration is invalid or the GitHub
    /// client cannot be built.
    pub fn from_config(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let source = GitHubSource::new(config.token())?;
        let checkout = GitCheckout::new(config.token());
        Self::new(config, source, checkout)
    }
}

impl<S: RepositorySource, C: Checkout> Runner<S, C> {
    /// Builds a runner from explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the configuration is invalid.
    pub fn new(config: RunnerConfig, source: S, checkout: C) -> Result<Self, RunnerError> {
        config.validate()?;

        let mut workspace = WorkspaceManager::new(checkout)
            .with_timeout(config.checkout_timeout())
            .with_retention(config.scan().retain_working_copies());
        if let Some(root) = config.clone_root() {
            workspace = workspace.with_clone_root(root.to_path_buf());
        }
        let matcher = Arc::new(PatternMatcher::from_config(config.scan()));

        Ok(Self {
            config,
            source,
            workspace,
            matcher,
        })
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Executes the full audit.
    ///
    /// Repositories that cannot be checked out are recorded as skipped and
    /// never abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Discovery`] if the organization cannot be listed.
    pub async fn run(&self) -> Result<ScanResult, RunnerError> {
        let organization = self.config.organization();
        info!(org = %organization, "Listing repositories");
        let listing = self.source.list_repositories(organization).await?;
        info!(org = %organization, count = listing.len(), "Found repositories");

        let candidates = select_candidates(
            listing,
            self.config.selection(),
            self.config.scan().limit(),
        );
        if candidates.is_empty() {
            warn!(org = %organization, "No repositories selected");
            return Ok(Aggregator::new().finalize());
        }

        info!(
            count = candidates.len(),
            concurrency = self.config.concurrency(),
            "Scanning repositories"
        );

        let mut outcomes: Vec<(usize, String, RepoOutcome)> =
            stream::iter(candidates.into_iter().enumerate())
                .map(|(index, repository)| async move {
                    let span = info_span!("repository", repo = %repository.name, index);
                    let outcome = self.scan_repository(&repository).instrument(span).await;
                    (index, repository.name, outcome)
                })
                .buffer_unordered(self.config.concurrency())
                .collect()
                .await;
        outcomes.sort_by_key(|(index, ..)| *index);

        let mut aggregator = Aggregator::new();
        for (_, name, outcome) in outcomes {
            aggregator.add(&name, outcome);
        }

        let result = aggregator.finalize();
        let summary = result.summary();
        info!(
            scanned = summary.repositories_scanned,
            skipped = summary.repositories_skipped,
            records = result.records().len(),
            "Audit finished"
        );
        Ok(result)
    }

    async fn scan_repository(&self, repository: &RepositoryRef) -> RepoOutcome {
        let copy = match self
            .workspace
            .acquire(repository, self.config.scan().branch())
            .await
        {
            Ok(copy) => copy,
            Err(e) if e.is_missing_branch() && self.config.scan().branch().is_none() => {
                info!("Repository has no commits on its default branch");
                return RepoOutcome::Scanned {
                    records: Vec::new(),
                    files_skipped: 0,
                    retained: None,
                };
            }
            Err(e) => {
                warn!(error = %e, "Skipping repository");
                return RepoOutcome::skipped(e);
            }
        };

        let matcher = Arc::clone(&self.matcher);
        let scanned = tokio::task::spawn_blocking(move || {
            let scan = matcher.scan(&copy);
            (copy, scan)
        })
        .await;

        let (copy, scan) = match scanned {
            Ok(scanned) => scanned,
            Err(e) => {
                error!(error = %e, "Scan task failed");
                return RepoOutcome::skipped(format!("scan task failed: {e}"));
            }
        };

        let retained = match self.workspace.release(copy) {
            Ok(retained) => retained,
            Err(e) => {
                warn!(error = %e, "Failed to remove working copy");
                None
            }
        };

        info!(
            matches = scan.records.len(),
            files_skipped = scan.files_skipped,
            "Scanned repository"
        );
        RepoOutcome::Scanned {
            records: scan.records,
            files_skipped: scan.files_skipped,
            retained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, ScanConfig};
    use crate::discovery::DiscoveryError;
    use crate::workspace::CheckoutError;
    use std::path::Path;

    struct MissingOrganization;

    impl RepositorySource for MissingOrganization {
        async fn list_repositories(
            &self,
            organization: &str,
        ) -> Result<Vec<RepositoryRef>, DiscoveryError> {
            Err(DiscoveryError::OrganizationNotFound {
                organization: organization.to_string(),
            })
        }
    }

    struct Unreachable;

    impl Checkout for Unreachable {
        async fn checkout(&self, _: &str, _: &str, _: &Path) -> Result<(), CheckoutError> {
            Err(CheckoutError::Failed {
                message: "unreachable".to_string(),
            })
        }
    }

    fn config() -> RunnerConfig {
        let scan = ScanConfig::builder().file_patterns(["*"]).build().unwrap();
        RunnerConfig::new("acme", "token", scan)
    }

    #[tokio::test]
    async fn listing_failure_aborts_run() {
        let runner = Runner::new(config(), MissingOrganization, Unreachable).unwrap();

        let result = runner.run().await;

        assert!(matches!(
            result,
            Err(RunnerError::Discovery(DiscoveryError::OrganizationNotFound { .. }))
        ));
    }

    #[test]
    fn rejects_invalid_config() {
        let result = Runner::new(config().with_concurrency(0), MissingOrganization, Unreachable);

        assert!(matches!(
            result,
            Err(RunnerError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
