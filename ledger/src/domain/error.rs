//! Errors returned by ledger operations.
//!
//! Validation failures are raised before the document is touched, so any
//! error from a mutating operation means nothing was written.

use rust_decimal::Decimal;

use super::EntityId;
use super::ports::DocumentStoreError;

/// Failure of a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A player with the same name, ignoring case, already exists.
    #[error("player already exists: {name}")]
    DuplicateName {
        /// Name that was requested.
        name: String,
    },
    /// The requested name is blank.
    #[error("player name must not be empty")]
    InvalidName,
    /// No player has the given identifier.
    #[error("player not found: {player_id}")]
    PlayerNotFound {
        /// Identifier that was looked up.
        player_id: EntityId,
    },
    /// The withdrawal exceeds the player's balance.
    #[error("insufficient balance: player {player_id} has {balance}, requested {requested}")]
    InsufficientBalance {
        /// Player whose balance was checked.
        player_id: EntityId,
        /// Balance at the time of the check.
        balance: Decimal,
        /// Amount requested.
        requested: Decimal,
    },
    /// The new balance would exceed the representable range.
    #[error("amount overflow: player {player_id} has {balance}, cannot apply {amount}")]
    AmountOverflow {
        /// Player whose balance was checked.
        player_id: EntityId,
        /// Balance at the time of the check.
        balance: Decimal,
        /// Amount requested.
        amount: Decimal,
    },
    /// The amount is negative.
    #[error("amount must not be negative: {amount}")]
    InvalidAmount {
        /// Amount that was rejected.
        amount: Decimal,
    },
    /// The document could not be read or written.
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

impl LedgerError {
    /// Whether the failure came from validation rather than the store.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
