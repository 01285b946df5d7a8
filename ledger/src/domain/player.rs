//! Player records held in the ledger document.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityId;
use super::serde_formats::{Timestamp, decimal_number};

/// Balance granted to every newly registered player.
pub const STARTING_BALANCE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// A registered player and their current balance.
///
/// ## Invariants
/// - `name` is unique among players ignoring case; checked at registration.
/// - `balance` is never taken below zero by a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Opaque identifier generated at registration.
    pub id: EntityId,
    /// Display name as entered at registration.
    pub name: String,
    /// Current balance.
    #[serde(with = "decimal_number")]
    pub balance: Decimal,
    /// Registration time.
    pub registered: Timestamp,
    /// Keys this crate does not interpret, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Player {
    /// Create a player holding the starting balance.
    pub fn register(id: EntityId, name: impl Into<String>, registered: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: STARTING_BALANCE,
            registered: registered.into(),
            extra: Map::new(),
        }
    }

    /// Whether `name` matches this player's name ignoring case.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn alice() -> Player {
        let registered = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid time");
        Player::register(EntityId::new("p1"), "Alice", registered)
    }

    #[test]
    fn registration_grants_starting_balance() {
        assert_eq!(alice().balance, Decimal::new(500, 0));
    }

    #[rstest]
    #[case("Alice", true)]
    #[case("alice", true)]
    #[case("ALICE", true)]
    #[case("Alicia", false)]
    fn names_compare_ignoring_case(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(alice().has_name(candidate), expected);
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let raw = json!({
            "id": "p1",
            "name": "Alice",
            "balance": 500,
            "registered": "2024-05-01T09:30:00Z",
            "avatar": "fox.png",
        });
        let player: Player = serde_json::from_value(raw.clone()).expect("decode player");

        assert_eq!(player.extra.get("avatar"), Some(&json!("fox.png")));
        assert_eq!(serde_json::to_value(&player).expect("encode player"), raw);
    }

    #[test]
    fn serialises_with_document_field_names() {
        let value = serde_json::to_value(alice()).expect("serialise player");
        assert_eq!(
            value,
            json!({
                "id": "p1",
                "name": "Alice",
                "balance": 500,
                "registered": "2024-05-01T09:30:00.000Z",
            })
        );
    }
}
