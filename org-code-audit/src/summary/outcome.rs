//! Outcome of one repository unit.

use crate::matcher::MatchRecord;
use std::path::PathBuf;

/// Result of processing a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// The repository was checked out and scanned.
    Scanned {
        /// Matches in traversal order.
        records: Vec<MatchRecord>,

        /// Files that matched by path but could not be read as text.
        files_skipped: usize,

        /// Location of the kept working copy, when retention is on.
        retained: Option<PathBuf>,
    },

    /// The repository could not be processed.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },
}

impl RepoOutcome {
    /// Creates a skipped outcome from any displayable error.
    pub fn skipped(reason: impl ToString) -> Self {
        Self::Skipped {
            reason: reason.to_string(),
        }
    }
}
