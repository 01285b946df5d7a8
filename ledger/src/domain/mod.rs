//! Domain model and services for the player ledger.
//!
//! Purpose: define the ledger document and its records, the rules applied
//! when registering players and moving money, and the ports through which
//! the document is read and written. Adapters live in `crate::outbound`.
//!
//! Public surface:
//! - `LedgerDocument`, `Player`, `Transaction`: the persisted state.
//! - `LedgerService`: implements `LedgerQuery` and `LedgerCommand`.
//! - `LedgerError`: failures of ledger operations.

mod document;
mod entity_id;
mod error;
mod ledger_service;
mod player;
pub mod ports;
pub mod serde_formats;
mod transaction;

pub use self::document::LedgerDocument;
pub use self::entity_id::{ClockRandomIdGenerator, EntityId, IdGenerator};
pub use self::error::LedgerError;
pub use self::ledger_service::{LedgerService, MutationReadPolicy, UnknownReadPolicy};
pub use self::player::{Player, STARTING_BALANCE};
pub use self::transaction::{Transaction, TransactionKind};
