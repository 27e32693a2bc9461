//! Match records.

use crate::discovery::RepositoryRef;
use serde::Serialize;

/// One reported match, at file or file+line granularity.
///
/// `line_number` and `matched_content` are set only when a content pattern
/// produced the match. Context lines are attached by the matcher and left out
/// of serialized output when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Repository name.
    pub repository: String,

    /// Repository URL.
    pub repository_url: String,

    /// Path relative to the working-copy root, `/`-separated.
    pub file_path: String,

    /// 1-based line number of a content match.
    pub line_number: Option<usize>,

    /// Trimmed content of the matched line.
    pub matched_content: Option<String>,

    /// Trimmed lines preceding the matched line, nearest last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_before: Option<Vec<String>>,

    /// Trimmed lines following the matched line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_after: Option<Vec<String>>,
}

impl MatchRecord {
    /// Creates a record for a file selected by path alone.
    pub fn path_match(repository: &RepositoryRef, file_path: impl Into<String>) -> Self {
        Self {
            repository: repository.name.clone(),
            repository_url: repository.report_url().to_string(),
            file_path: file_path.into(),
            line_number: None,
            matched_content: None,
            context_before: None,
            context_after: None,
        }
    }

    /// Creates a record for a content pattern found on a line.
    pub fn content_match(
        repository: &RepositoryRef,
        file_path: impl Into<String>,
        line_number: usize,
        matched_content: impl Into<String>,
    ) -> Self {
        Self {
            line_number: Some(line_number),
            matched_content: Some(matched_content.into()),
            ..Self::path_match(repository, file_path)
        }
    }

    /// Attaches the lines surrounding a content match.
    #[must_use]
    pub fn with_context(mut self, before: Vec<String>, after: Vec<String>) -> Self {
        self.context_before = Some(before);
        self.context_after = Some(after);
        self
    }

    /// Returns true if a content pattern produced this record.
    #[must_use]
    pub fn is_content_match(&self) -> bool {
        self.line_number.is_some()
    }
}
