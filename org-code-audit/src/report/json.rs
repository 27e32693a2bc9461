//! JSON report.

use crate::matcher::MatchRecord;
use crate::summary::{ScanResult, ScanSummary};
use serde::Serialize;
use std::io::Write;

/// One element of the top-level array.
#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a> {
    Match(&'a MatchRecord),
    Summary { summary: &'a ScanSummary },
}

/// Writes a pretty-printed array of records followed by a summary object.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialization or writing fails.
pub fn write_json<W: Write>(result: &ScanResult, mut writer: W) -> Result<(), serde_json::Error> {
    let entries: Vec<Entry<'_>> = result
        .records()
        .iter()
        .map(Entry::Match)
        .chain(std::iter::once(Entry::Summary {
            summary: result.summary(),
        }))
        .collect();

    serde_json::to_writer_pretty(&mut writer, &entries)?;
    writeln!(writer).map_err(serde_json::Error::io)
}
