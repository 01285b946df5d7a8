//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{EntityId, IdGenerator};

/// Clock returning a settable instant.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start the clock at 2024-05-01T09:30:00Z.
    pub fn fixed() -> Self {
        let now = match Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single() {
            Some(now) => now,
            None => panic!("fixed clock instant must be valid"),
        };
        Self::new(now)
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Identifier generator yielding `{prefix}-1`, `{prefix}-2`, ...
pub struct SequenceIdGenerator {
    prefix: String,
    next: AtomicUsize,
}

impl SequenceIdGenerator {
    /// Build a generator using `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(1),
        }
    }
}

impl Default for SequenceIdGenerator {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn generate(&self) -> EntityId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        EntityId::new(format!("{}-{n}", self.prefix))
    }
}
