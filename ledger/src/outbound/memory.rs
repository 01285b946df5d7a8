//! Process-local document store.
//!
//! Holds the document as serialised JSON so reads and writes pass through
//! the same encoding as the remote store. Used by tests and by the CLI's
//! `--in-memory` dry-run mode. Failures can be injected to exercise the
//! service's read and write policies.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::LedgerDocument;
use crate::domain::ports::{DocumentStoreError, LedgerDocumentStore};

#[derive(Default)]
struct MemoryState {
    record: Option<Vec<u8>>,
    writes: usize,
    read_failure: Option<DocumentStoreError>,
    write_failure: Option<DocumentStoreError>,
}

/// In-memory [`LedgerDocumentStore`]. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `document`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Decode`] if the document cannot be
    /// encoded.
    pub fn with_document(document: &LedgerDocument) -> Result<Self, DocumentStoreError> {
        let store = Self::new();
        store.lock()?.record = Some(encode(document)?);
        Ok(store)
    }

    /// Decode the currently stored document, if any was written.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Decode`] if the stored bytes are invalid.
    pub fn snapshot(&self) -> Result<Option<LedgerDocument>, DocumentStoreError> {
        self.lock()?.record.as_deref().map(decode).transpose()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.lock().map(|state| state.writes).unwrap_or_default()
    }

    /// Make every subsequent read fail with `error`.
    pub fn fail_reads_with(&self, error: DocumentStoreError) {
        if let Ok(mut state) = self.lock() {
            state.read_failure = Some(error);
        }
    }

    /// Make every subsequent write fail with `error`.
    pub fn fail_writes_with(&self, error: DocumentStoreError) {
        if let Ok(mut state) = self.lock() {
            state.write_failure = Some(error);
        }
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.lock() {
            state.read_failure = None;
            state.write_failure = None;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, DocumentStoreError> {
        self.state
            .lock()
            .map_err(|_| DocumentStoreError::transport("in-memory store lock poisoned"))
    }
}

fn encode(document: &LedgerDocument) -> Result<Vec<u8>, DocumentStoreError> {
    serde_json::to_vec(document).map_err(|error| DocumentStoreError::decode(error.to_string()))
}

fn decode(bytes: &[u8]) -> Result<LedgerDocument, DocumentStoreError> {
    serde_json::from_slice(bytes).map_err(|error| DocumentStoreError::decode(error.to_string()))
}

#[async_trait]
impl LedgerDocumentStore for InMemoryDocumentStore {
    async fn fetch_document(&self) -> Result<LedgerDocument, DocumentStoreError> {
        let state = self.lock()?;
        if let Some(error) = &state.read_failure {
            return Err(error.clone());
        }
        match state.record.as_deref() {
            Some(bytes) => decode(bytes),
            None => Ok(LedgerDocument::default()),
        }
    }

    async fn persist_document(&self, document: &LedgerDocument) -> Result<(), DocumentStoreError> {
        let bytes = encode(document)?;
        let mut state = self.lock()?;
        if let Some(error) = &state.write_failure {
            return Err(error.clone());
        }
        state.record = Some(bytes);
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, Player};
    use crate::test_support::MutableClock;
    use mockable::Clock;

    fn document_with_alice() -> LedgerDocument {
        let clock = MutableClock::fixed();
        LedgerDocument {
            players: vec![Player::register(EntityId::new("p1"), "Alice", clock.utc())],
            transactions: Vec::new(),
            ..LedgerDocument::default()
        }
    }

    #[tokio::test]
    async fn empty_store_reads_as_default_document() {
        let store = InMemoryDocumentStore::new();
        let document = store.fetch_document().await.expect("read succeeds");
        assert_eq!(document, LedgerDocument::default());
        assert!(store.snapshot().expect("snapshot").is_none());
    }

    #[tokio::test]
    async fn writes_are_visible_to_clones() {
        let store = InMemoryDocumentStore::new();
        let clone = store.clone();
        let document = document_with_alice();

        store
            .persist_document(&document)
            .await
            .expect("write succeeds");

        assert_eq!(clone.fetch_document().await.expect("read"), document);
        assert_eq!(clone.write_count(), 1);
    }

    #[tokio::test]
    async fn injected_write_failure_keeps_previous_record() {
        let document = document_with_alice();
        let store = InMemoryDocumentStore::with_document(&document).expect("seed store");
        store.fail_writes_with(DocumentStoreError::transport("status 503"));

        let error = store
            .persist_document(&LedgerDocument::default())
            .await
            .expect_err("write fails");

        assert_eq!(error, DocumentStoreError::transport("status 503"));
        assert_eq!(store.snapshot().expect("snapshot"), Some(document));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn cleared_failures_restore_reads() {
        let store = InMemoryDocumentStore::new();
        store.fail_reads_with(DocumentStoreError::timeout("slow"));
        assert!(store.fetch_document().await.is_err());

        store.clear_failures();
        assert!(store.fetch_document().await.is_ok());
    }
}
