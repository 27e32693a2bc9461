//! CSV and JSON report emitters.

mod csv;
mod error;
mod json;

pub use self::csv::{write_csv, CSV_HEADER};
pub use error::ReportError;
pub use json::write_json;

use crate::summary::ScanResult;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Directory that receives relative report paths.
pub const REPORTS_DIR: &str = "reports";

/// Report file name used when none is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "results.csv";

/// Output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    /// Infers the format from a file extension, defaulting to CSV.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ReportError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
        })
    }
}

/// Resolves where a report is written.
///
/// Relative paths are placed under [`REPORTS_DIR`] unless they already start
/// with it. Absolute paths are used as given.
#[must_use]
pub fn resolve_output_path(output: &Path) -> PathBuf {
    if output.is_absolute() {
        return output.to_path_buf();
    }
    let mut components = output
        .components()
        .filter(|c| !matches!(c, Component::CurDir));
    match components.next() {
        Some(Component::Normal(first)) if first == REPORTS_DIR => output.to_path_buf(),
        _ => Path::new(REPORTS_DIR).join(output),
    }
}

/// Writes `result` to `path`, creating parent directories as needed.
///
/// The file is written even when there are no records.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be created or written.
pub fn write_report(
    result: &ScanResult,
    format: ReportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::Create {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let file = File::create(path).map_err(|e| ReportError::Create {
        path: path.display().to_string(),
        source: e,
    })?;
    let writer = BufWriter::new(file);

    match format {
        ReportFormat::Csv => write_csv(result, writer)?,
        ReportFormat::Json => write_json(result, writer)?,
    }

    info!(path = %path.display(), %format, records = result.records().len(), "Wrote report");
    Ok(())
}
