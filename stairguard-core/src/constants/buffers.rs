//! Buffer Sizes
//!
//! Capacities for the fixed-size ring buffers. These are compile-time
//! constants: buffers are never resized.

/// Raw samples kept for median stabilization.
///
/// Five samples at 50 ms cadence cover 250 ms, enough to reject single
/// echo dropouts without smearing a real fall.
pub const DEBOUNCE_DEPTH: usize = 5;

/// Kinematic samples kept for sustained-evidence checks.
///
/// A criterion must hold for at least `CONSECUTIVE_READINGS - 1` of the last
/// `CONSECUTIVE_READINGS` samples. Also the length of the resume grace period.
pub const CONSECUTIVE_READINGS: usize = 3;

/// Maximum intents emitted by a single cycle.
///
/// Worst case is a state entry that deploys and raises an alert.
pub const MAX_INTENTS_PER_CYCLE: usize = 4;

const _: () = assert!(CONSECUTIVE_READINGS >= 2, "sustained evidence needs at least two samples");
const _: () = assert!(DEBOUNCE_DEPTH >= 1, "stabilizer needs at least one slot");
