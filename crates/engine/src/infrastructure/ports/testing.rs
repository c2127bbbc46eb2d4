//! Ports that exist so tests can control time.

use chrono::{DateTime, Utc};

/// Clock abstraction.
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
