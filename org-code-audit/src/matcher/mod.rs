//! Path and content matching over a working copy.
//!
//! The tree is walked in file-name order at every level, skipping `.git`.
//! Files whose relative path matches any [`FilePatterns`] entry are kept.
//! Without content patterns each kept file yields one path-only
//! [`MatchRecord`]. With content patterns every (line, pattern) occurrence
//! yields a record carrying the line number, trimmed line content and up to
//! [`CONTEXT_LINES`] trimmed lines on either side.
//!
//! Symbolic links are not followed into directories. A link to a file is
//! reported under its own path when its target resolves inside the root.

mod patterns;
mod record;

pub use patterns::{ContentPatterns, FilePatterns};
pub use record::MatchRecord;

use crate::config::ScanConfig;
use crate::discovery::RepositoryRef;
use crate::workspace::WorkingCopy;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Version-control metadata pruned from every walk.
const VCS_DIR: &str = ".git";

/// Bytes inspected when deciding whether a file is binary.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Lines of context captured on each side of a content match.
pub const CONTEXT_LINES: usize = 2;

/// Records produced for one working copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// Matches in traversal order.
    pub records: Vec<MatchRecord>,

    /// Path-matched files that could not be read as text.
    pub files_skipped: usize,
}

/// Why a path-matched file was left out of content scanning.
#[derive(Debug, Error)]
enum FileSkip {
    #[error("unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary content")]
    Binary,

    #[error("not valid UTF-8")]
    NotUtf8,
}

/// Applies file and content patterns to working copies.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    file_patterns: FilePatterns,
    content_patterns: ContentPatterns,
}

impl PatternMatcher {
    /// Creates a matcher from pattern sets.
    #[must_use]
    pub fn new(file_patterns: FilePatterns, content_patterns: ContentPatterns) -> Self {
        Self {
            file_patterns,
            content_patterns,
        }
    }

    /// Creates a matcher from the patterns of a scan configuration.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            config.file_patterns().clone(),
            config.content_patterns().clone(),
        )
    }

    /// Scans a working copy.
    #[must_use]
    pub fn scan(&self, copy: &WorkingCopy) -> FileScan {
        self.scan_tree(copy.root(), copy.repository())
    }

    /// Scans the tree under `root`, attributing matches to `repository`.
    ///
    /// Path-matched files that cannot be read as text are counted in
    /// [`FileScan::files_skipped`]. Unreadable directory entries are logged.
    /// Neither aborts the scan.
    #[must_use]
    pub fn scan_tree(&self, root: &Path, repository: &RepositoryRef) -> FileScan {
        let mut scan = FileScan::default();
        if self.file_patterns.is_empty() {
            return scan;
        }

        let files = self.matching_files(root);
        debug!(repo = %repository.name, count = files.len(), "Files matching path patterns");

        if self.content_patterns.is_empty() {
            scan.records = files
                .into_iter()
                .map(|file| MatchRecord::path_match(repository, file))
                .collect();
            return scan;
        }

        for file in files {
            match read_text(&root.join(&file)) {
                Ok(content) => self.scan_content(repository, &file, &content, &mut scan.records),
                Err(reason) => {
                    debug!(repo = %repository.name, file = %file, %reason, "Skipping file");
                    scan.files_skipped += 1;
                }
            }
        }

        scan
    }

    /// Returns the `/`-separated relative paths of matching files, in walk
    /// order.
    #[must_use]
    pub fn matching_files(&self, root: &Path) -> Vec<String> {
        let mut files = Vec::new();
        let canonical_root = std::fs::canonicalize(root).ok();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_vcs_metadata(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                if !links_to_file_within(entry.path(), canonical_root.as_deref()) {
                    debug!(path = %entry.path().display(), "Ignoring symbolic link");
                    continue;
                }
            } else if !file_type.is_file() {
                continue;
            }

            let Some(relative) = relative_path(root, entry.path()) else {
                continue;
            };
            if self.file_patterns.matches(&relative) {
                files.push(relative);
            }
        }

        files
    }

    fn scan_content(
        &self,
        repository: &RepositoryRef,
        file: &str,
        content: &str,
        records: &mut Vec<MatchRecord>,
    ) {
        let lines: Vec<&str> = content.lines().collect();
        for (index, line) in lines.iter().enumerate() {
            for _pattern in self.content_patterns.occurrences(line) {
                let (before, after) = context(&lines, index);
                records.push(
                    MatchRecord::content_match(repository, file, index + 1, line.trim())
                        .with_context(before, after),
                );
            }
        }
    }
}

/// Returns the trimmed lines around `index`, clipped at the file bounds.
fn context(lines: &[&str], index: usize) -> (Vec<String>, Vec<String>) {
    let trimmed = |slice: &[&str]| -> Vec<String> {
        slice.iter().map(|line| line.trim().to_string()).collect()
    };
    let start = index.saturating_sub(CONTEXT_LINES);
    let end = (index + 1 + CONTEXT_LINES).min(lines.len());
    (trimmed(&lines[start..index]), trimmed(&lines[index + 1..end]))
}

/// Returns true if `link` resolves to a regular file under `root`.
fn links_to_file_within(link: &Path, root: Option<&Path>) -> bool {
    let Some(root) = root else {
        return false;
    };
    match std::fs::canonicalize(link) {
        Ok(target) => target.starts_with(root) && target.is_file(),
        Err(_) => false,
    }
}

fn is_vcs_metadata(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name() == OsStr::new(VCS_DIR)
}

/// Joins the components below `root` with `/`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Reads a file as UTF-8 text, rejecting content that looks binary.
fn read_text(path: &Path) -> Result<String, FileSkip> {
    let bytes = std::fs::read(path)?;
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(FileSkip::Binary);
    }
    String::from_utf8(bytes).map_err(|_| FileSkip::NotUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("infra", "https://github.com/acme/infra.git", "main")
            .with_html_url("https://github.com/acme/infra")
    }

    fn write(root: &Path, path: &str, content: &[u8]) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn matcher(files: &[&str], contents: &[&str]) -> PatternMatcher {
        PatternMatcher::new(
            FilePatterns::compile(files).unwrap(),
            ContentPatterns::new(contents),
        )
    }

    #[test]
    fn path_only_scan_yields_one_record_per_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.tf", b"resource {}");
        write(temp.path(), "vars.tf", b"variable {}");
        write(temp.path(), "readme.md", b"# infra");

        let scan = matcher(&["*.tf"], &[]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.records[0].file_path, "main.tf");
        assert_eq!(scan.records[1].file_path, "vars.tf");
        assert!(scan.records.iter().all(|r| r.line_number.is_none()));
        assert!(scan.records.iter().all(|r| r.matched_content.is_none()));
        assert_eq!(scan.records[0].repository_url, "https://github.com/acme/infra");
    }

    #[test]
    fn content_scan_reports_each_matching_line() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "a.py",
            b"import os\n\nTODO: fix\nprint()\nTODO: later\n",
        );

        let scan = matcher(&["*.py"], &["TODO:"]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.records[0].line_number, Some(3));
        assert_eq!(scan.records[0].matched_content.as_deref(), Some("TODO: fix"));
        assert_eq!(scan.records[1].line_number, Some(5));
        assert_eq!(scan.records[1].matched_content.as_deref(), Some("TODO: later"));
    }

    #[test]
    fn each_pattern_on_a_line_is_a_separate_record() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.py", b"x = 1  # TODO FIXME\n");

        let scan = matcher(&["*.py"], &["TODO", "FIXME"]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.records.len(), 2);
        assert!(scan.records.iter().all(|r| r.line_number == Some(1)));
    }

    #[test]
    fn content_matching_is_case_sensitive() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.py", b"todo: lower\nTODO: upper\n");

        let scan = matcher(&["*.py"], &["TODO:"]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.records[0].line_number, Some(2));
    }

    #[test]
    fn files_without_content_matches_contribute_nothing() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.py", b"print('clean')\n");

        let scan = matcher(&["*.py"], &["TODO:"]).scan_tree(temp.path(), &repo());

        assert!(scan.records.is_empty());
        assert_eq!(scan.files_skipped, 0);
    }

    #[test]
    fn binary_and_non_utf8_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "blob.dat", b"TODO:\0\x01\x02");
        write(temp.path(), "latin1.dat", b"TODO: caf\xe9\n");
        write(temp.path(), "text.dat", b"TODO: ok\n");

        let scan = matcher(&["*.dat"], &["TODO:"]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.files_skipped, 2);
        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.records[0].file_path, "text.dat");
    }

    #[test]
    fn git_metadata_is_never_scanned() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), ".git/config", b"[core]");
        write(temp.path(), ".git/hooks/pre-commit.sample", b"#!/bin/sh");
        write(temp.path(), "config", b"app");

        let files = matcher(&["*"], &[]).matching_files(temp.path());

        assert_eq!(files, ["config"]);
    }

    #[test]
    fn walk_order_is_lexicographic_and_nested() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.tf", b"");
        write(temp.path(), "a/z.tf", b"");
        write(temp.path(), "a/b/c.tf", b"");
        write(temp.path(), "c.tf", b"");

        let files = matcher(&["*.tf"], &[]).matching_files(temp.path());

        assert_eq!(files, ["a/b/c.tf", "a/z.tf", "b.tf", "c.tf"]);
    }

    #[test]
    fn path_patterns_use_relative_paths() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/app.py", b"");
        write(temp.path(), "tests/app.py", b"");

        let files = matcher(&["src/*.py"], &[]).matching_files(temp.path());

        assert_eq!(files, ["src/app.py"]);
    }

    #[test]
    fn overlapping_patterns_report_a_file_once() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.tf", b"");

        let scan = matcher(&["*.tf", "main.*", "*"], &[]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.records.len(), 1);
    }

    #[test]
    fn empty_file_patterns_match_nothing() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.tf", b"TODO:");

        let scan = matcher(&[], &["TODO:"]).scan_tree(temp.path(), &repo());

        assert_eq!(scan, FileScan::default());
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.ps1", b"  Write-Host TODO: x\r\nok\r\n");

        let scan = matcher(&["*.ps1"], &["TODO:"]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.records[0].matched_content.as_deref(), Some("Write-Host TODO: x"));
    }

    #[test]
    fn content_matches_carry_surrounding_lines() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "a.py",
            b"one\n  two\nthree\n  TODO: middle\nfive\nsix  \nseven\n",
        );

        let scan = matcher(&["*.py"], &["TODO:"]).scan_tree(temp.path(), &repo());

        let record = &scan.records[0];
        assert_eq!(record.context_before, Some(vec!["two".to_string(), "three".to_string()]));
        assert_eq!(record.context_after, Some(vec!["five".to_string(), "six".to_string()]));
    }

    #[test]
    fn context_is_clipped_at_file_edges() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.py", b"TODO: first\nsecond\nTODO: last");

        let scan = matcher(&["*.py"], &["TODO:"]).scan_tree(temp.path(), &repo());

        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.records[0].context_before, Some(Vec::new()));
        assert_eq!(
            scan.records[0].context_after,
            Some(vec!["second".to_string(), "TODO: last".to_string()])
        );
        assert_eq!(
            scan.records[1].context_before,
            Some(vec!["TODO: first".to_string(), "second".to_string()])
        );
        assert_eq!(scan.records[1].context_after, Some(Vec::new()));
    }

    #[test]
    fn path_matches_have_no_context() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "main.tf", b"resource {}\n");

        let scan = matcher(&["*.tf"], &[]).scan_tree(temp.path(), &repo());

        assert!(scan.records[0].context_before.is_none());
        assert!(scan.records[0].context_after.is_none());
    }

    #[test]
    fn unreadable_entries_are_not_counted_as_skipped_files() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.py", b"TODO: x\n");

        let scan = matcher(&["*.py"], &["TODO:"]).scan_tree(&temp.path().join("missing"), &repo());

        assert!(scan.records.is_empty());
        assert_eq!(scan.files_skipped, 0);
    }

    #[cfg(unix)]
    #[test]
    fn file_links_inside_the_root_are_reported() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write(temp.path(), "real.tf", b"TODO: shared\n");
        write(outside.path(), "secret.tf", b"TODO: outside\n");
        symlink(temp.path().join("real.tf"), temp.path().join("link.tf")).unwrap();
        symlink(outside.path().join("secret.tf"), temp.path().join("escape.tf")).unwrap();
        symlink(temp.path().join("gone.tf"), temp.path().join("dangling.tf")).unwrap();

        let files = matcher(&["*.tf"], &[]).matching_files(temp.path());

        assert_eq!(files, ["link.tf", "real.tf"]);
    }

    #[cfg(unix)]
    #[test]
    fn directory_links_are_not_followed() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        write(temp.path(), "modules/vpc/main.tf", b"");
        symlink(temp.path().join("modules"), temp.path().join("alias")).unwrap();

        let files = matcher(&["*.tf"], &[]).matching_files(temp.path());

        assert_eq!(files, ["modules/vpc/main.tf"]);
    }
}
