//! Collects repository outcomes into a [`ScanResult`].

use super::outcome::RepoOutcome;
use super::result::{RetainedCopy, ScanResult, SkippedRepository};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

/// Accumulates outcomes in the order they are added.
///
/// Records from different repositories are never merged, even when they
/// share a file path.
#[derive(Debug, Default)]
pub struct Aggregator {
    result: ScanResult,
    completed: HashSet<String>,
}

impl Aggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one repository.
    ///
    /// A repository that was already recorded is ignored.
    pub fn add(&mut self, repository: &str, outcome: RepoOutcome) {
        if !self.completed.insert(repository.to_string()) {
            warn!(repo = %repository, "Ignoring repeated outcome for repository");
            return;
        }

        let result = &mut self.result;
        match outcome {
            RepoOutcome::Scanned {
                records,
                files_skipped,
                retained,
            } => {
                let summary = &mut result.summary;
                summary.repositories_scanned += 1;
                summary.files_skipped += files_skipped;
                summary.content_matches += records.iter().filter(|r| r.is_content_match()).count();
                summary.files_matched += records
                    .iter()
                    .map(|r| r.file_path.as_str())
                    .collect::<BTreeSet<_>>()
                    .len();

                result.records.extend(records);
                if let Some(path) = retained {
                    result.retained.push(RetainedCopy {
                        repository: repository.to_string(),
                        path,
                    });
                }
            }
            RepoOutcome::Skipped { reason } => {
                result.summary.repositories_skipped += 1;
                result.skipped.push(SkippedRepository {
                    repository: repository.to_string(),
                    reason,
                });
            }
        }
    }

    /// Returns the number of repositories recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Produces the result. Repeated calls return equal results.
    #[must_use]
    pub fn finalize(&self) -> ScanResult {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::RepositoryRef;
    use crate::matcher::MatchRecord;
    use crate::summary::RunStatus;
    use std::path::PathBuf;

    fn repo(name: &str) -> RepositoryRef {
        RepositoryRef::new(name, format!("https://github.com/acme/{name}.git"), "main")
    }

    fn scanned(records: Vec<MatchRecord>) -> RepoOutcome {
        RepoOutcome::Scanned {
            records,
            files_skipped: 0,
            retained: None,
        }
    }

    #[test]
    fn can_count_outcomes() {
        let api = repo("api");
        let mut aggregator = Aggregator::new();

        aggregator.add(
            "api",
            RepoOutcome::Scanned {
                records: vec![
                    MatchRecord::content_match(&api, "a.py", 3, "TODO: one"),
                    MatchRecord::content_match(&api, "a.py", 5, "TODO: two"),
                    MatchRecord::content_match(&api, "b.py", 1, "TODO: three"),
                ],
                files_skipped: 2,
                retained: None,
            },
        );
        aggregator.add("gone", RepoOutcome::skipped("checkout failed"));

        let result = aggregator.finalize();
        let summary = result.summary();

        assert_eq!(summary.repositories_scanned, 1);
        assert_eq!(summary.repositories_skipped, 1);
        assert_eq!(summary.files_matched, 2);
        assert_eq!(summary.content_matches, 3);
        assert_eq!(summary.files_skipped, 2);
        assert_eq!(result.skipped()[0].repository, "gone");
        assert_eq!(result.skipped()[0].reason, "checkout failed");
        assert_eq!(result.status(), RunStatus::Partial);
    }

    #[test]
    fn keeps_same_path_from_different_repositories() {
        let mut aggregator = Aggregator::new();
        aggregator.add("api", scanned(vec![MatchRecord::path_match(&repo("api"), "main.tf")]));
        aggregator.add("web", scanned(vec![MatchRecord::path_match(&repo("web"), "main.tf")]));

        let result = aggregator.finalize();

        assert_eq!(result.records().len(), 2);
        assert_eq!(result.records()[0].repository, "api");
        assert_eq!(result.records()[1].repository, "web");
        assert_eq!(result.summary().files_matched, 2);
        assert_eq!(result.summary().content_matches, 0);
        assert_eq!(result.status(), RunStatus::Matched);
    }

    #[test]
    fn ignores_repeated_repository() {
        let mut aggregator = Aggregator::new();
        aggregator.add("api", scanned(vec![MatchRecord::path_match(&repo("api"), "main.tf")]));
        aggregator.add("api", RepoOutcome::skipped("late failure"));

        let result = aggregator.finalize();

        assert_eq!(aggregator.len(), 1);
        assert_eq!(result.records().len(), 1);
        assert_eq!(result.summary().repositories_skipped, 0);
    }

    #[test]
    fn finalize_is_repeatable() {
        let mut aggregator = Aggregator::new();
        aggregator.add(
            "api",
            RepoOutcome::Scanned {
                records: vec![MatchRecord::content_match(&repo("api"), "a.py", 1, "TODO:")],
                files_skipped: 1,
                retained: Some(PathBuf::from("/tmp/org-code-audit-api-x")),
            },
        );

        let first = aggregator.finalize();
        let second = aggregator.finalize();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.retained().len(), 1);
    }

    #[test]
    fn scanned_repository_without_matches_counts_as_scanned() {
        let mut aggregator = Aggregator::new();
        aggregator.add("quiet", scanned(Vec::new()));

        let result = aggregator.finalize();

        assert!(result.is_empty());
        assert_eq!(result.summary().repositories_scanned, 1);
        assert_eq!(result.status(), RunStatus::NoMatches);
    }
}
