//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **jsonbin**: reqwest-backed store for the remote JSONBin document
//! - **memory**: process-local store for tests and dry runs
//!
//! Adapters translate between the domain document and the storage
//! representation. They contain no business logic.

pub mod jsonbin;
pub mod memory;
