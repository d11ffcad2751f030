// crates/readiness-cli/src/report_sink.rs
// ============================================================================
// Module: File Report Sink
// Description: Writes readiness reports and their digests to an output directory.
// Purpose: Persist the canonical report, a checksum, and a Markdown summary.
// Dependencies: readiness-core, time
// ============================================================================

//! ## Overview
//! [`FileReportSink`] writes three files into its output directory:
//! - `readiness-report.json`: the report as canonical JSON (RFC 8785);
//! - `readiness-report.json.sha256`: the report digest in `sha256sum` format;
//! - `readiness-summary.md`: a localized human-readable summary.
//!
//! The summary is rendered from the report alone and never re-derives a
//! status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use readiness_core::ReadinessReport;
use readiness_core::ReportReceipt;
use readiness_core::ReportSink;
use readiness_core::ReportWriteError;
use readiness_core::Timestamp;
use readiness_core::core::hashing::canonical_json_bytes;
use readiness_core::core::hashing::sha256_hex;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Report file name.
pub const REPORT_FILE: &str = "readiness-report.json";
/// Report digest file name.
pub const DIGEST_FILE: &str = "readiness-report.json.sha256";
/// Markdown summary file name.
pub const SUMMARY_FILE: &str = "readiness-summary.md";

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Report sink writing into a directory.
#[derive(Debug, Clone)]
pub struct FileReportSink {
    /// Output directory, created on first write.
    out_dir: PathBuf,
}

impl FileReportSink {
    /// Creates a sink over `out_dir`.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Writes `bytes` to `name` and returns its receipt.
    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<ReportReceipt, ReportWriteError> {
        let path = self.out_dir.join(name);
        fs::write(&path, bytes)
            .map_err(|err| ReportWriteError::Io(format!("{}: {err}", path.display())))?;
        Ok(ReportReceipt {
            location: path.display().to_string(),
            digest: format!("sha256:{}", sha256_hex(bytes)),
        })
    }
}

impl ReportSink for FileReportSink {
    fn write(&self, report: &ReadinessReport) -> Result<Vec<ReportReceipt>, ReportWriteError> {
        fs::create_dir_all(&self.out_dir)
            .map_err(|err| ReportWriteError::Io(format!("{}: {err}", self.out_dir.display())))?;
        let bytes = canonical_json_bytes(report)
            .map_err(|err| ReportWriteError::Serialize(err.to_string()))?;
        let report_receipt = self.write_file(REPORT_FILE, &bytes)?;
        let digest_line = format!("{}  {REPORT_FILE}\n", sha256_hex(&bytes));
        self.write_file(DIGEST_FILE, digest_line.as_bytes())?;
        let summary = render_summary_markdown(report);
        let summary_receipt = self.write_file(SUMMARY_FILE, summary.as_bytes())?;
        Ok(vec![report_receipt, summary_receipt])
    }
}

// ============================================================================
// SECTION: Markdown
// ============================================================================

/// Renders the Markdown summary of a report.
#[must_use]
pub fn render_summary_markdown(report: &ReadinessReport) -> String {
    let release = report.release();
    let mut lines =
        vec![t!("summary.md.title", service = release.service, version = release.version)];
    lines.push(String::new());
    lines.push(t!("summary.md.overall", status = report.overall_status()));
    lines.push(String::new());
    lines.push(t!(
        "summary.md.build",
        build_id = report.build_id(),
        generated_at = format_timestamp(report.generated_at())
    ));
    if let Some(commit) = &release.commit {
        lines.push(t!("summary.md.commit", commit = commit));
    }
    if !report.is_complete() {
        lines.push(String::new());
        lines.push(t!("summary.md.incomplete"));
    }

    lines.push(String::new());
    lines.push(t!("summary.md.checks_header"));
    lines.push(String::new());
    lines.push(t!("summary.md.table_header"));
    lines.push(t!("summary.md.table_rule"));
    for check in report.checks() {
        let required = if check.required() {
            t!("summary.md.required.yes")
        } else {
            t!("summary.md.required.no")
        };
        lines.push(t!(
            "summary.md.table_row",
            name = escape_cell(check.name()),
            status = check.status(),
            required = required,
            summary = escape_cell(check.summary())
        ));
    }

    push_id_list(&mut lines, t!("summary.md.blocking_header"), report.blocking());
    push_id_list(&mut lines, t!("summary.md.non_blocking_header"), report.non_blocking());

    let explained: Vec<_> =
        report.checks().iter().filter(|check| !check.reasons().is_empty()).collect();
    if !explained.is_empty() {
        lines.push(String::new());
        lines.push(t!("summary.md.reasons_header"));
        for check in explained {
            lines.push(String::new());
            lines.push(t!("summary.md.check_header", name = check.name(), status = check.status()));
            lines.push(String::new());
            for reason in check.reasons() {
                lines.push(t!("summary.md.reason", reason = reason));
            }
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Appends a headed list of identifiers.
fn push_id_list(lines: &mut Vec<String>, header: String, ids: &[String]) {
    lines.push(String::new());
    lines.push(header);
    lines.push(String::new());
    if ids.is_empty() {
        lines.push(t!("summary.md.none"));
    }
    for id in ids {
        lines.push(t!("summary.md.item", id = id));
    }
}

/// Escapes table delimiters and line breaks inside a table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Formats a timestamp as RFC 3339, falling back to unix milliseconds.
fn format_timestamp(timestamp: Timestamp) -> String {
    let millis = timestamp.as_unix_millis();
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|instant| instant.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("{millis} ms"))
}
