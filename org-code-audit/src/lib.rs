#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod discovery;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod summary;
pub mod workspace;

pub use config::{AuditFile, ConfigError, RepoNameList, RepoSelection, ScanConfig, ScanConfigBuilder};
pub use discovery::{
    select_candidates, DiscoveryError, GitHubSource, RepositoryRef, RepositorySource,
};
pub use matcher::{
    ContentPatterns, FilePatterns, FileScan, MatchRecord, PatternMatcher, CONTEXT_LINES,
};
pub use report::{resolve_output_path, write_report, ReportError, ReportFormat};
pub use runner::{Runner, RunnerConfig, RunnerError, DEFAULT_CONCURRENCY};
pub use summary::{
    Aggregator, RepoOutcome, RepositoryTotals, RetainedCopy, RunStatus, ScanResult, ScanSummary,
    SkippedRepository,
};
pub use workspace::{
    Checkout, CheckoutError, GitCheckout, WorkingCopy, WorkspaceError, WorkspaceManager,
};
