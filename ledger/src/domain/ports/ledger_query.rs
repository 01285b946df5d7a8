//! Driving port for reading aggregate ledger state.

use async_trait::async_trait;

use crate::domain::LedgerDocument;

/// Read side of the ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Return the current document, or the empty document when the store
    /// cannot be read. Never fails; failures are logged.
    async fn get_data(&self) -> LedgerDocument;
}
