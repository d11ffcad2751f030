// crates/readiness-adapters/src/confluence.rs
// ============================================================================
// Module: Confluence Snapshot Adapter
// Description: Normalizes exported Confluence page metadata.
// Purpose: Serve page presence and last-update time from the evidence directory.
// Dependencies: readiness-core, serde
// ============================================================================

//! ## Overview
//! Reads `confluence/<page_id>.json`, the content resource as returned by
//! `rest/api/content/<id>?expand=version`. The update instant comes from
//! `version.when`; a page without one is unusable as freshness evidence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use readiness_core::AdapterError;
use readiness_core::ConfluenceAdapter;
use readiness_core::interfaces::PageRecord;
use serde::Deserialize;

use crate::snapshot::SnapshotStore;
use crate::snapshot::off_thread;
use crate::snapshot::parse_rfc3339;

// ============================================================================
// SECTION: Wire Format
// ============================================================================

/// Exported content resource.
#[derive(Debug, Deserialize)]
struct ContentResource {
    /// Page id.
    id: String,
    /// Page title.
    title: String,
    /// Version block.
    version: VersionBlock,
    /// Link block.
    #[serde(default, rename = "_links")]
    links: LinkBlock,
}

/// Version block.
#[derive(Debug, Deserialize)]
struct VersionBlock {
    /// RFC 3339 instant of the latest version.
    when: String,
}

/// Link block.
#[derive(Debug, Default, Deserialize)]
struct LinkBlock {
    /// Site base URL.
    #[serde(default)]
    base: Option<String>,
    /// Page path relative to `base`.
    #[serde(default)]
    webui: Option<String>,
}

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// Confluence adapter over exported content resources.
pub struct SnapshotConfluence {
    /// Evidence reader.
    store: SnapshotStore,
}

impl SnapshotConfluence {
    /// Creates the adapter.
    #[must_use]
    pub const fn new(store: SnapshotStore) -> Self {
        Self {
            store,
        }
    }
}

#[async_trait]
impl ConfluenceAdapter for SnapshotConfluence {
    async fn page(&self, page_id: &str) -> Result<PageRecord, AdapterError> {
        let store = self.store.clone();
        let page_id = page_id.to_string();
        off_thread(move || {
            let content = store.load::<ContentResource>(&["confluence", &page_id])?.document;
            if content.id != page_id {
                return Err(AdapterError::NotFound(format!(
                    "snapshot confluence/{page_id} describes page {}",
                    content.id
                )));
            }
            let updated_at = parse_rfc3339(&content.version.when)
                .map_err(|detail| AdapterError::Unreadable(format!("version.when: {detail}")))?;
            let url = match (content.links.base, content.links.webui) {
                (Some(base), Some(path)) => Some(format!("{}{path}", base.trim_end_matches('/'))),
                _ => None,
            };
            Ok(PageRecord {
                page_id,
                title: content.title,
                updated_at,
                url,
            })
        })
        .await
    }
}
