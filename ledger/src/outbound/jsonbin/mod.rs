//! JSONBin outbound adapter.
//!
//! Thin HTTP implementation of the `LedgerDocumentStore` port against the
//! JSONBin v3 API: `GET /b/{id}/latest` to read and `PUT /b/{id}` to
//! overwrite.

mod config;
mod dto;
mod http_store;

pub use config::{CredentialHeader, DEFAULT_BASE_URL, JsonBinConfig, UnknownKeyScheme};
pub use http_store::JsonBinDocumentStore;
