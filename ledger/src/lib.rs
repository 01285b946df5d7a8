//! Player balance ledger persisted as one JSONBin document.
//!
//! The `domain` module holds the ledger rules and ports, `outbound` the
//! store adapters, and `config` the settings used by the `ledger` binary.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
