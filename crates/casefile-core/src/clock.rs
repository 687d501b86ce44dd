//! Time source for traversal event timestamps.

use chrono::{DateTime, Utc};

/// Stamps `occurred_at` on traversal events. Tests pin it to a fixed
/// instant so event metadata is reproducible.
pub trait Clock: Send + Sync {
    /// The instant to record for an event created now.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used by the game binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_does_not_run_backwards() {
        let clock = SystemClock;

        let first = clock.now();
        let second = clock.now();

        assert!(second >= first);
    }
}
