//! Repository inclusion and exclusion lists.
//!
//! A list file holds one repository name per line:
//!
//! ```text
//! repository
//! infra-live
//! payments-api
//! ```
//!
//! The `repository` header is optional and blank lines are ignored.

use crate::config::ConfigError;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Header token that may appear on the first line of a list file.
const HEADER: &str = "repository";

/// UTF-8 byte-order mark written by some spreadsheet exports.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// A set of repository names loaded from a list file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoNameList {
    names: BTreeSet<String>,
}

impl RepoNameList {
    /// Loads a list from disk. A missing file yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not UTF-8, or
    /// contains an entry that is not a repository name.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Repository list not found, using empty list");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let list = Self::parse(&content, &path.display().to_string())?;
        debug!(path = %path.display(), count = list.len(), "Loaded repository list");
        Ok(list)
    }

    /// Parses list content. `origin` names the source in error messages.
    ///
    /// A leading byte-order mark is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedList`] for entries that are not repository names.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let mut names = BTreeSet::new();
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);

        for (index, line) in content.lines().enumerate() {
            let name = line.trim();
            if name.is_empty() {
                continue;
            }
            if index == 0 && name.eq_ignore_ascii_case(HEADER) {
                continue;
            }
            if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
                return Err(ConfigError::MalformedList {
                    path: origin.to_string(),
                    line: index + 1,
                    message: format!("'{name}' contains invalid character {bad:?}"),
                });
            }
            names.insert(name.to_string());
        }

        Ok(Self { names })
    }

    /// Returns true if the list names this repository.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Iterates the names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RepoNameList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Inclusion and exclusion rules applied to the organization listing.
///
/// An empty inclusion list places no restriction. Exclusion always wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSelection {
    inclusions: RepoNameList,
    exclusions: RepoNameList,
}

impl RepoSelection {
    /// Creates a selection from the two lists.
    #[must_use]
    pub fn new(inclusions: RepoNameList, exclusions: RepoNameList) -> Self {
        Self {
            inclusions,
            exclusions,
        }
    }

    /// Loads both lists from disk.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] raised by either list.
    pub fn load(inclusions: &Path, exclusions: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(
            RepoNameList::load(inclusions)?,
            RepoNameList::load(exclusions)?,
        ))
    }

    /// Returns the inclusion list.
    pub fn inclusions(&self) -> &RepoNameList {
        &self.inclusions
    }

    /// Returns the exclusion list.
    pub fn exclusions(&self) -> &RepoNameList {
        &self.exclusions
    }

    /// Returns true if the inclusion list admits this repository.
    #[must_use]
    pub fn is_included(&self, name: &str) -> bool {
        self.inclusions.is_empty() || self.inclusions.contains(name)
    }

    /// Returns true if the exclusion list names this repository.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.contains(name)
    }
}

/// Characters GitHub allows in repository names.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}
