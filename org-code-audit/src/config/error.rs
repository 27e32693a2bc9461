//! Configuration error types.

use thiserror::Error;

/// Errors that abort a run before any repository is checked out.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse configuration file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Missing required file.
    #[error("Missing required file: {path}")]
    MissingFile { path: String },

    /// A repository name list contains an entry that is not a repository name.
    #[error("Malformed repository list '{path}' at line {line}: {message}")]
    MalformedList {
        path: String,
        line: usize,
        message: String,
    },

    /// No file patterns were supplied.
    #[error("At least one file pattern is required")]
    NoFilePatterns,

    /// A file pattern is not a valid glob.
    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The requested branch is not a valid git reference name.
    #[error("Invalid branch name '{branch}': {message}")]
    InvalidBranch { branch: String, message: String },

    /// The organization name is not a valid GitHub login.
    #[error("Invalid organization '{organization}': {message}")]
    InvalidOrganization {
        organization: String,
        message: String,
    },

    /// A numeric setting is out of range.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}
