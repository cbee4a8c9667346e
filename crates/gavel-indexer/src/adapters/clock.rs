//! System clock adapter.

use crate::ports::outbound::Clock;
use chrono::{DateTime, Utc};

/// Production clock backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
