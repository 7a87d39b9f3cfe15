/*!
 * Clock
 * The single "now()" capability every duration is derived from
 */

use super::types::Timestamp;
use std::time::Instant;

/// Monotonic time source
pub trait Clock {
    /// Current time as an offset from the clock's epoch
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by [`Instant`], with its epoch at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Timestamp {
        self.epoch.elapsed()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        thread::sleep(Duration::from_millis(2));
        assert!(clock.now() > first);
    }
}
