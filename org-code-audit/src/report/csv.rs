//! CSV report.

use crate::summary::ScanResult;
use std::io::Write;

/// Column names, in output order.
pub const CSV_HEADER: [&str; 4] = ["repository", "repository_url", "file_path", "line_number"];

/// Writes one row per record after a header row.
///
/// Path-only records leave `line_number` empty.
///
/// # Errors
///
/// Returns any error raised by the writer.
pub fn write_csv<W: Write>(result: &ScanResult, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;

    for record in result.records() {
        let line_number = record
            .line_number
            .map(|n| n.to_string())
            .unwrap_or_default();
        writeln!(
            writer,
            "{},{},{},{}",
            escape(&record.repository),
            escape(&record.repository_url),
            escape(&record.file_path),
            line_number
        )?;
    }

    writer.flush()
}

/// Quotes values containing a delimiter, quote, or line break.
fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
