//! Shared fixtures for board integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use kanban_core::{BoardService, MemorySlotStorage, TaskStore};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Manually advanced clock; clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now_ms: Arc<AtomicI64>,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now.timestamp_millis())),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms.load(Ordering::SeqCst)).unwrap()
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now()
    }
}

pub fn memory_board() -> (BoardService<MemorySlotStorage, FixedClock>, FixedClock) {
    let clock = FixedClock::default();
    let store = TaskStore::new(MemorySlotStorage::new(), clock.clone());
    (BoardService::new(store), clock)
}
