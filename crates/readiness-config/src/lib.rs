// crates/readiness-config/src/lib.rs
// ============================================================================
// Module: Readiness Config Library
// Description: Canonical readiness.toml model, validation, and resolution.
// Purpose: Single source of truth for readiness.toml semantics.
// Dependencies: readiness-core, serde, toml
// ============================================================================

//! ## Overview
//! `readiness-config` defines the configuration model for readiness runs. It
//! provides strict, fail-closed validation and resolves the validated file into
//! the core policy, release identity, and runner limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
mod resolve;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
