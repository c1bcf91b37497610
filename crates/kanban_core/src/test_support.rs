//! Deterministic clock shared by unit tests.
//!
//! Integration tests carry their own copy in `tests/common` with `advance`;
//! keep the default instant of both in step.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TestClock {
    now_ms: Arc<AtomicI64>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now.timestamp_millis())),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms.load(Ordering::SeqCst))
            .expect("test clock millis should be in range")
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now()
    }
}
