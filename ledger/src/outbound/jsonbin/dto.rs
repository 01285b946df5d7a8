//! Wire envelopes returned by the JSONBin API.

use serde::Deserialize;

use crate::domain::LedgerDocument;

/// Body of `GET /b/{id}/latest`. Metadata is ignored.
#[derive(Debug, Deserialize)]
pub(super) struct LatestRecordDto {
    #[serde(default)]
    record: Option<LedgerDocument>,
}

impl LatestRecordDto {
    /// Stored document, or the empty document when the bin holds none.
    pub(super) fn into_document(self) -> LedgerDocument {
        self.record.unwrap_or_default()
    }
}
