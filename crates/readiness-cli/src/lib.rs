// crates/readiness-cli/src/lib.rs
// ============================================================================
// Module: Readiness CLI Library
// Description: Shared helpers for the `readiness` command-line interface.
// Purpose: Provide the message catalog, audit sinks, and report sink.
// Dependencies: readiness-core, serde_json, time
// ============================================================================

//! ## Overview
//! The binary entry point (`src/main.rs`) wires configuration, snapshot
//! adapters, and the runner together; the pieces it reuses live here so tests
//! can exercise them without spawning the binary. All user-facing text is
//! routed through the [`t!`] catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// JSON-lines audit sinks.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
/// Report persistence and Markdown rendering.
pub mod report_sink;
