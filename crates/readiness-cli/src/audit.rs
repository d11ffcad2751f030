// crates/readiness-cli/src/audit.rs
// ============================================================================
// Module: CLI Audit Sinks
// Description: JSON-lines audit sinks for readiness runs.
// Purpose: Deliver runner audit events to stderr or an append-only file.
// Dependencies: readiness-core, serde_json
// ============================================================================

//! ## Overview
//! One audit event per line, serialized with `serde_json`. Sinks never fail
//! the run: a serialization or write error drops the line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use readiness_core::AuditEvent;
use readiness_core::AuditSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink writing JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink appending JSON lines to a file.
pub struct FileAuditSink {
    /// Append-only file handle.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens `path` for appending, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}
