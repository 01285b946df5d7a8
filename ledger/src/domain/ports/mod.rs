//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod document_store;
mod ledger_command;
mod ledger_query;

#[cfg(test)]
pub use document_store::MockLedgerDocumentStore;
pub use document_store::{DocumentStoreError, LedgerDocumentStore};
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::LedgerCommand;
#[cfg(test)]
pub use ledger_query::MockLedgerQuery;
pub use ledger_query::LedgerQuery;
