//! Append-only transaction log entries.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;
use super::serde_formats::{Timestamp, decimal_number};

/// Kind of balance event recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Starting grant issued at registration.
    Register,
    /// Money taken out of a balance.
    Withdraw,
    /// Money added to a balance.
    Deposit,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Register => "register",
            Self::Withdraw => "withdraw",
            Self::Deposit => "deposit",
        };
        f.write_str(label)
    }
}

/// One entry of the transaction log.
///
/// `player_id` is a weak reference: the store does not enforce that the
/// player exists, and externally seeded entries may point nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque identifier.
    pub id: EntityId,
    /// Player the event applies to.
    pub player_id: EntityId,
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Amount moved by the event.
    #[serde(with = "decimal_number")]
    pub amount: Decimal,
    /// Time of occurrence.
    pub timestamp: Timestamp,
    /// Keys this crate does not interpret, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
