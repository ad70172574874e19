//! Extraction store
//!
//! Write-once keyed map of document extractions. Records are inserted by
//! the intake service when extraction succeeds and are never mutated or
//! deleted for the life of the process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::DocumentExtraction;

/// Shared in-memory extraction store
#[derive(Debug, Clone, Default)]
pub struct ExtractionStore {
    extractions: Arc<RwLock<HashMap<Uuid, DocumentExtraction>>>,
}

impl ExtractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an extraction keyed by its document id
    ///
    /// Document ids are freshly generated per upload, so an existing key
    /// indicates a caller bug; the insert overwrites and logs.
    pub async fn put(&self, extraction: DocumentExtraction) {
        let doc_id = extraction.doc_id;
        if self
            .extractions
            .write()
            .await
            .insert(doc_id, extraction)
            .is_some()
        {
            tracing::warn!(doc_id = %doc_id, "Overwrote existing extraction record");
        }
    }

    /// Snapshot an extraction by document id
    pub async fn get(&self, doc_id: Uuid) -> Option<DocumentExtraction> {
        self.extractions.read().await.get(&doc_id).cloned()
    }
}
