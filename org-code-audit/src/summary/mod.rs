//! Per-repository outcomes and their aggregation into a run result.

mod aggregator;
mod outcome;
mod result;

pub use aggregator::Aggregator;
pub use outcome::RepoOutcome;
pub use result::{
    RepositoryTotals, RetainedCopy, RunStatus, ScanResult, ScanSummary, SkippedRepository,
};
