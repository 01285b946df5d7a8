//! Opaque identifiers for players and transactions.
//!
//! Generated identifiers are the current time in milliseconds followed by a
//! random suffix, both in base 36. They are unique with overwhelming
//! probability but neither monotonic nor collision-checked. Identifiers read
//! from the store are accepted verbatim, so externally seeded records keep
//! whatever format they were written with.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Opaque string identifier stored in the ledger document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

/// Source of fresh identifiers.
pub trait IdGenerator: Send + Sync {
    /// Produce a new identifier.
    fn generate(&self) -> EntityId;
}

/// Time-plus-randomness identifier generator.
pub struct ClockRandomIdGenerator {
    clock: Arc<dyn Clock>,
}

impl ClockRandomIdGenerator {
    /// Build a generator reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl IdGenerator for ClockRandomIdGenerator {
    fn generate(&self) -> EntityId {
        let millis = u64::try_from(self.clock.utc().timestamp_millis()).unwrap_or_default();
        let suffix: u64 = rand::thread_rng().r#gen();
        EntityId(format!("{}{}", to_base36(millis), to_base36(suffix)))
    }
}

fn to_base36(mut value: u64) -> String {
    let mut digits = Vec::with_capacity(13);
    loop {
        let digit = value
            .checked_rem(36)
            .and_then(|rem| u32::try_from(rem).ok())
            .and_then(|rem| char::from_digit(rem, 36))
            .unwrap_or('0');
        digits.push(digit);
        value = value.checked_div(36).unwrap_or_default();
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().collect()
}
