//! File and content pattern sets.

use crate::config::ConfigError;
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;

/// Glob options shared by every file pattern.
///
/// Matching is case-sensitive and `*` never crosses a `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single compiled file pattern.
#[derive(Debug, Clone)]
struct FilePattern {
    source: String,
    glob: Pattern,
    /// Patterns without a `/` are matched against the file name only.
    file_name_only: bool,
}

impl FilePattern {
    fn matches(&self, relative_path: &str) -> bool {
        let candidate = if self.file_name_only {
            relative_path.rsplit('/').next().unwrap_or(relative_path)
        } else {
            relative_path
        };
        self.glob.matches_with(candidate, MATCH_OPTIONS)
    }
}

/// Ordered, de-duplicated set of compiled file globs.
///
/// A path matches the set when it matches any pattern. An empty set matches
/// nothing.
#[derive(Debug, Clone, Default)]
pub struct FilePatterns {
    patterns: Vec<FilePattern>,
}

impl FilePatterns {
    /// Compiles the given globs, dropping blanks and duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first glob that fails to compile.
    pub fn compile<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = normalize_patterns(patterns)
            .into_iter()
            .map(|source| {
                let glob = Pattern::new(&source).map_err(|e| ConfigError::InvalidPattern {
                    pattern: source.clone(),
                    source: e,
                })?;
                Ok(FilePattern {
                    file_name_only: !source.contains('/'),
                    source,
                    glob,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { patterns })
    }

    /// Returns true if no patterns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the number of distinct patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns the pattern strings in their original order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    /// Returns true if a `/`-separated relative path matches any pattern.
    #[must_use]
    pub fn matches(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative_path))
    }

    /// Keeps the paths that match, preserving their order.
    pub fn filter<'a, I>(&self, paths: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        paths.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Ordered, de-duplicated set of case-sensitive substring patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPatterns {
    patterns: Vec<String>,
}

impl ContentPatterns {
    /// Builds the set, dropping blanks and duplicates.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: normalize_patterns(patterns),
        }
    }

    /// Returns true if no patterns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the number of distinct patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns the patterns in their original order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Returns the patterns that occur in `line`, in pattern order.
    pub fn occurrences<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |p| line.contains(p))
    }
}

/// Trims patterns and removes blanks and repeats, keeping first occurrences.
fn normalize_patterns<I, S>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    patterns
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}
