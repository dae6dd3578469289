//! Request timestamps for Coinbase API authentication.
//!
//! Coinbase rejects signed requests whose timestamp falls outside a short
//! window around server time, so every request captures a fresh value.

use time::OffsetDateTime;

/// Trait for providing request timestamps.
pub trait TimestampProvider: Send + Sync {
    /// Current Unix time in whole seconds.
    fn now(&self) -> i64;
}

/// A timestamp provider backed by the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimestamp;

impl SystemTimestamp {
    /// Create a new system clock timestamp provider.
    pub fn new() -> Self {
        Self
    }
}

impl TimestampProvider for SystemTimestamp {
    fn now(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }
}
