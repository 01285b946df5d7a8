//! The ledger document: every player and every transaction in one value.
//!
//! The document is the unit of reading and writing against the store. It is
//! fetched fresh for each operation, mutated in memory, and written back in
//! full.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EntityId, Player, Transaction};

/// Entire persisted ledger state.
///
/// A stored document missing either list decodes with that list empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    /// Players in registration order.
    #[serde(default)]
    pub players: Vec<Player>,
    /// Transactions in occurrence order. Append-only.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Top-level keys this crate does not interpret, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LedgerDocument {
    /// Look up a player by identifier.
    pub fn find_player(&self, id: &EntityId) -> Option<&Player> {
        self.players.iter().find(|player| &player.id == id)
    }

    pub(crate) fn find_player_mut(&mut self, id: &EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| &player.id == id)
    }

    /// Look up a player by name, ignoring case.
    pub fn find_player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.has_name(name))
    }

    /// Transactions for one player, in log order.
    pub fn transactions_for<'a>(
        &'a self,
        player_id: &'a EntityId,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |entry| &entry.player_id == player_id)
    }

    /// Sum of all player balances.
    pub fn total_balance(&self) -> Decimal {
        self.players.iter().map(|player| player.balance).sum()
    }

    /// Append an entry to the transaction log.
    pub(crate) fn append(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}
