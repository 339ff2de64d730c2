//! Time management for the monitoring loop
//!
//! The engine never reads a clock on its own: the caller owns the clock
//! and passes timestamps in. This keeps every cycle reproducible under
//! tick injection.
//!
//! - [`ManualClock`] for tests and replays
//! - [`SystemClock`] (std) for hosted deployments

use crate::constants::time::MS_PER_SECOND;

/// Timestamp in milliseconds since an arbitrary epoch (usually boot)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32;
}

/// Monotonic clock measured from construction (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Start a clock at zero
    pub fn new() -> Self {
        Self { origin: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Caller-driven clock for tests and replays
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    timestamp: Timestamp,
}

impl ManualClock {
    /// Clock starting at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute time
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Seconds between two timestamps
///
/// A clock that went backwards yields 0, which the kinematics estimator
/// treats as a degenerate interval.
pub fn elapsed_secs(earlier: Timestamp, later: Timestamp) -> f32 {
    later.saturating_sub(earlier) as f32 / MS_PER_SECOND as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = ManualClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(50);
        assert_eq!(clock.now(), 1050);

        clock.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    fn elapsed_in_seconds() {
        assert_eq!(elapsed_secs(1000, 1050), 0.05);
        assert_eq!(elapsed_secs(0, 2000), 2.0);
    }

    #[test]
    fn backwards_clock_is_zero() {
        assert_eq!(elapsed_secs(2000, 1000), 0.0);
    }
}
