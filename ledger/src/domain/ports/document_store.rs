//! Driven port for reading and writing the whole ledger document.
//!
//! The remote store holds exactly one document. Adapters fetch it in full and
//! overwrite it in full; there is no partial update and no version check, so
//! concurrent writers race and the last write wins.

use async_trait::async_trait;

use crate::domain::LedgerDocument;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by document store adapters.
    pub enum DocumentStoreError {
        /// Credentials or the document identifier are not configured.
        Configuration { message: String } =>
            "document store not configured: {message}",
        /// Network failure or non-success HTTP status.
        Transport { message: String } =>
            "document store transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "document store timeout: {message}",
        /// The stored payload is not a valid ledger document.
        Decode { message: String } =>
            "document store response decode failed: {message}",
    }
}

/// Port for the remote ledger document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerDocumentStore: Send + Sync {
    /// Fetch the latest full document.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use ledger::domain::ports::LedgerDocumentStore;
    /// use ledger::outbound::memory::InMemoryDocumentStore;
    ///
    /// let store = InMemoryDocumentStore::default();
    /// let document = store.fetch_document().await?;
    /// assert!(document.players.is_empty());
    /// # Ok::<(), ledger::domain::ports::DocumentStoreError>(())
    /// ```
    async fn fetch_document(&self) -> Result<LedgerDocument, DocumentStoreError>;

    /// Overwrite the remote document with `document`.
    async fn persist_document(&self, document: &LedgerDocument) -> Result<(), DocumentStoreError>;
}
