//! Driving port for balance-changing ledger operations.
//!
//! The CLI and any other inbound adapter call [`LedgerCommand`] to register
//! players and move money. Each call is one read-modify-write cycle against
//! the document store.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{EntityId, LedgerError, Player};

/// Driving port for ledger mutations.
///
/// Implementations validate against the freshly read document and only write
/// when validation passes. A returned error means nothing was persisted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Register a new player with the starting grant.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateName`] when a player with the same name
    /// (ignoring case) exists, [`LedgerError::InvalidName`] for blank names,
    /// and [`LedgerError::Store`] when the document cannot be read or written.
    async fn register_player(&self, name: &str) -> Result<Player, LedgerError>;

    /// Withdraw `amount` from a player's balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PlayerNotFound`],
    /// [`LedgerError::InsufficientBalance`], [`LedgerError::InvalidAmount`],
    /// or [`LedgerError::Store`].
    async fn withdraw_money(
        &self,
        player_id: &EntityId,
        amount: Decimal,
    ) -> Result<Player, LedgerError>;

    /// Deposit `amount` into a player's balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PlayerNotFound`], [`LedgerError::InvalidAmount`],
    /// or [`LedgerError::Store`].
    async fn deposit_money(
        &self,
        player_id: &EntityId,
        amount: Decimal,
    ) -> Result<Player, LedgerError>;
}
