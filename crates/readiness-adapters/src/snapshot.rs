// crates/readiness-adapters/src/snapshot.rs
// ============================================================================
// Module: Snapshot Store
// Description: Bounded, root-confined reads of exported evidence files.
// Purpose: Give every snapshot adapter one safe way to load a document.
// Dependencies: readiness-core, serde, serde_json, serde_yaml, thiserror, time
// ============================================================================

//! ## Overview
//! Snapshot adapters read evidence exported ahead of the run into a single
//! evidence directory. Every lookup is built from path segments that come from
//! configuration, so segments are checked before use and the resolved file must
//! stay under the canonical root. Reads are capped at `max_bytes`. A document
//! may be JSON or, when allowed, YAML; `.json` wins when both exist.
//! Security posture: evidence files are untrusted input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use readiness_core::AdapterError;
use readiness_core::Timestamp;
use serde::de::DeserializeOwned;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default maximum size of one evidence file.
const DEFAULT_MAX_BYTES: usize = 1024 * 1024;
/// Maximum length of one lookup segment.
const MAX_SEGMENT_LENGTH: usize = 255;

/// Snapshot evidence configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Evidence root directory.
    pub root: PathBuf,
    /// Maximum size of one evidence file in bytes.
    pub max_bytes: usize,
    /// Whether `.yaml`/`.yml` documents are accepted.
    pub allow_yaml: bool,
}

impl SnapshotConfig {
    /// Configuration rooted at `root` with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_bytes: DEFAULT_MAX_BYTES,
            allow_yaml: true,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Snapshot read failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The evidence root does not exist or is not a directory.
    #[error("invalid evidence root: {0}")]
    Root(String),
    /// A lookup segment or resolved path was rejected.
    #[error("rejected evidence path: {0}")]
    Path(String),
    /// No document exists for the lookup.
    #[error("no snapshot for {0}")]
    Missing(String),
    /// The document exceeds the size limit.
    #[error("snapshot {0} exceeds size limit")]
    TooLarge(String),
    /// The document could not be read.
    #[error("snapshot {0} unreadable")]
    Io(String),
    /// The document does not match the expected shape.
    #[error("snapshot {path} invalid: {detail}")]
    Parse {
        /// Offending document.
        path: String,
        /// Parser message.
        detail: String,
    },
}

impl From<SnapshotError> for AdapterError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Missing(_) => Self::NotFound(err.to_string()),
            _ => Self::Unreadable(err.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// A document read from the evidence directory.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// Parsed document.
    pub document: T,
    /// Resolved file path.
    pub path: PathBuf,
    /// File modification instant, when the platform reports one.
    pub modified_at: Option<Timestamp>,
}

/// Root-confined evidence reader.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    /// Canonical evidence root.
    root: PathBuf,
    /// Maximum size of one document.
    max_bytes: usize,
    /// Whether YAML documents are accepted.
    allow_yaml: bool,
}

impl SnapshotStore {
    /// Opens the evidence root.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Root`] when the root cannot be canonicalized or
    /// is not a directory.
    pub fn open(config: &SnapshotConfig) -> Result<Self, SnapshotError> {
        let root = config
            .root
            .canonicalize()
            .map_err(|err| SnapshotError::Root(format!("{}: {err}", config.root.display())))?;
        if !root.is_dir() {
            return Err(SnapshotError::Root(format!("{} is not a directory", root.display())));
        }
        Ok(Self {
            root,
            max_bytes: config.max_bytes,
            allow_yaml: config.allow_yaml,
        })
    }

    /// Canonical evidence root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads and parses the document at `segments`, trying `.json` then YAML.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the lookup is rejected, absent, too large,
    /// unreadable, or does not parse into `T`.
    pub fn load<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Snapshot<T>, SnapshotError> {
        let (path, bytes, modified_at) = self.read_document(segments)?;
        let document = parse_document(&path, &bytes)?;
        Ok(Snapshot {
            document,
            path,
            modified_at,
        })
    }

    /// Loads the raw bytes of the `.json` document at `segments`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the lookup is rejected, absent, too large,
    /// or unreadable.
    pub fn load_raw(&self, segments: &[&str]) -> Result<Snapshot<Vec<u8>>, SnapshotError> {
        let stem = self.resolve(segments)?;
        let path = with_extension(&stem, "json");
        let bytes = self.read_limited(&path)?;
        Ok(Snapshot {
            modified_at: modified_at(&path),
            document: bytes,
            path,
        })
    }

    /// Reads the first existing candidate document.
    fn read_document(
        &self,
        segments: &[&str],
    ) -> Result<(PathBuf, Vec<u8>, Option<Timestamp>), SnapshotError> {
        let stem = self.resolve(segments)?;
        let mut extensions = vec!["json"];
        if self.allow_yaml {
            extensions.extend(["yaml", "yml"]);
        }
        for extension in extensions {
            let path = with_extension(&stem, extension);
            match self.read_limited(&path) {
                Err(SnapshotError::Missing(_)) => {}
                Ok(bytes) => {
                    let modified_at = modified_at(&path);
                    return Ok((path, bytes, modified_at));
                }
                Err(err) => return Err(err),
            }
        }
        Err(SnapshotError::Missing(segments.join("/")))
    }

    /// Joins checked segments onto the root, without an extension.
    fn resolve(&self, segments: &[&str]) -> Result<PathBuf, SnapshotError> {
        if segments.is_empty() {
            return Err(SnapshotError::Path("empty lookup".to_string()));
        }
        let mut path = self.root.clone();
        for segment in segments {
            for part in segment.split('/') {
                validate_segment(part)?;
                path.push(part);
            }
        }
        Ok(path)
    }

    /// Reads a file under the root while enforcing the size limit.
    fn read_limited(&self, path: &Path) -> Result<Vec<u8>, SnapshotError> {
        let display = self.relative(path);
        let resolved = match path.canonicalize() {
            Ok(resolved) => resolved,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(SnapshotError::Missing(display));
            }
            Err(_) => return Err(SnapshotError::Io(display)),
        };
        if !resolved.starts_with(&self.root) {
            return Err(SnapshotError::Path(format!("{display} escapes evidence root")));
        }
        let file = File::open(&resolved).map_err(|_| SnapshotError::Io(display.clone()))?;
        let limit = u64::try_from(self.max_bytes.saturating_add(1))
            .map_err(|_| SnapshotError::TooLarge(display.clone()))?;
        let mut buf = Vec::new();
        file.take(limit).read_to_end(&mut buf).map_err(|_| SnapshotError::Io(display.clone()))?;
        if buf.len() > self.max_bytes {
            return Err(SnapshotError::TooLarge(display));
        }
        Ok(buf)
    }

    /// Path relative to the root, for messages.
    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root).unwrap_or(path).display().to_string()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects segments that could leave the root or address nothing.
fn validate_segment(segment: &str) -> Result<(), SnapshotError> {
    if segment.is_empty() || segment.len() > MAX_SEGMENT_LENGTH {
        return Err(SnapshotError::Path(format!("invalid segment length in {segment:?}")));
    }
    if segment.contains('\\') || segment.contains('\0') {
        return Err(SnapshotError::Path(format!("invalid character in {segment:?}")));
    }
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SnapshotError::Path(format!("segment {segment:?} is not a plain name"))),
    }
}

/// Appends an extension without replacing dots already in the stem.
fn with_extension(stem: &Path, extension: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// File modification instant.
fn modified_at(path: &Path) -> Option<Timestamp> {
    let modified = path.metadata().and_then(|meta| meta.modified()).ok()?;
    let millis = OffsetDateTime::from(modified).unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).ok().map(Timestamp::from_unix_millis)
}

/// Parses a JSON or YAML document by extension.
fn parse_document<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, SnapshotError> {
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
    let parsed = if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
        serde_yaml::from_slice(bytes).map_err(|err| err.to_string())
    } else {
        serde_json::from_slice(bytes).map_err(|err| err.to_string())
    };
    parsed.map_err(|detail| SnapshotError::Parse {
        path: path.display().to_string(),
        detail,
    })
}

/// Parses an RFC 3339 instant into a [`Timestamp`].
///
/// # Errors
///
/// Returns a message when the value is not RFC 3339 or is out of range.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, String> {
    let parsed = OffsetDateTime::parse(value.trim(), &Rfc3339)
        .map_err(|err| format!("invalid timestamp {value:?}: {err}"))?;
    let millis = parsed.unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis)
        .map(Timestamp::from_unix_millis)
        .map_err(|_| format!("timestamp {value:?} out of range"))
}

/// Parses an optional RFC 3339 field, reporting the field name on failure.
pub(crate) fn parse_optional(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Timestamp>, AdapterError> {
    value
        .map(parse_rfc3339)
        .transpose()
        .map_err(|detail| AdapterError::Unreadable(format!("{field}: {detail}")))
}

/// Runs a snapshot read on the blocking pool so adapter timeouts stay effective.
pub(crate) async fn off_thread<T, F>(read: F) -> Result<T, AdapterError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AdapterError> + Send + 'static,
{
    tokio::task::spawn_blocking(read)
        .await
        .map_err(|err| AdapterError::Unreadable(format!("snapshot read aborted: {err}")))?
}

// ============================================================================
// SECTION: Tests
// ============================================================================
