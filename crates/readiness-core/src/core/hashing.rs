// crates/readiness-core/src/core/hashing.rs
// ============================================================================
// Module: Readiness Canonical Hashing
// Description: RFC 8785 JSON canonicalization and content hashing utilities.
// Purpose: Provide deterministic digests for evidence records and reports.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Evidence `raw_ref` values and report digests are SHA-256 over canonical
//! JSON (JCS), so identical inputs always produce identical references.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing canonical hashes.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Returns the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex_encode(&hasher.finalize())
}

/// Returns a `sha256:<hex>` reference for the canonical form of `value`.
///
/// Serialization failures yield `None`; a missing reference never changes a
/// decision.
#[must_use]
pub fn content_ref<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    canonical_json_bytes(value).ok().map(|bytes| format!("sha256:{}", sha256_hex(&bytes)))
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[usize::from(byte >> 4)] as char);
        out.push(HEX[usize::from(byte & 0x0f)] as char);
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
