//! Final result of a run.

use crate::matcher::MatchRecord;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Counters describing a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Repositories checked out and scanned.
    pub repositories_scanned: usize,

    /// Repositories that could not be processed.
    pub repositories_skipped: usize,

    /// Distinct files contributing at least one record.
    pub files_matched: usize,

    /// Records carrying a line number.
    pub content_matches: usize,

    /// Path-matched files that were not readable as text.
    pub files_skipped: usize,
}

/// A repository left out of the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRepository {
    /// Repository name.
    pub repository: String,

    /// Why it was skipped.
    pub reason: String,
}

/// A working copy kept on disk after scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetainedCopy {
    /// Repository name.
    pub repository: String,

    /// Location of the checkout.
    pub path: PathBuf,
}

/// Per-repository share of the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryTotals {
    /// Repository name.
    pub repository: String,

    /// Distinct files with at least one record.
    pub files: usize,

    /// Records attributed to the repository.
    pub matches: usize,
}

/// Overall outcome of a run, used to pick the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// At least one record and no skipped repositories.
    Matched,

    /// Every repository was scanned and nothing matched.
    NoMatches,

    /// At least one repository was skipped.
    Partial,
}

/// Ordered match records plus run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub(crate) records: Vec<MatchRecord>,
    pub(crate) summary: ScanSummary,
    pub(crate) skipped: Vec<SkippedRepository>,
    pub(crate) retained: Vec<RetainedCopy>,
}

impl ScanResult {
    /// Returns the records in candidate order, then traversal order.
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Returns the run counters.
    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    /// Returns the skipped repositories in candidate order.
    pub fn skipped(&self) -> &[SkippedRepository] {
        &self.skipped
    }

    /// Returns the retained working copies in candidate order.
    pub fn retained(&self) -> &[RetainedCopy] {
        &self.retained
    }

    /// Returns file and match counts for each repository with records, in
    /// candidate order.
    #[must_use]
    pub fn repository_totals(&self) -> Vec<RepositoryTotals> {
        let mut totals: Vec<RepositoryTotals> = Vec::new();
        let mut files = HashSet::new();

        for record in &self.records {
            match totals.last_mut() {
                Some(last) if last.repository == record.repository => last.matches += 1,
                _ => {
                    files.clear();
                    totals.push(RepositoryTotals {
                        repository: record.repository.clone(),
                        files: 0,
                        matches: 1,
                    });
                }
            }
            if files.insert(record.file_path.as_str()) {
                if let Some(last) = totals.last_mut() {
                    last.files += 1;
                }
            }
        }

        totals
    }

    /// Returns true if no records were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Classifies the run.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        if self.summary.repositories_skipped > 0 {
            RunStatus::Partial
        } else if self.records.is_empty() {
            RunStatus::NoMatches
        } else {
            RunStatus::Matched
        }
    }
}
