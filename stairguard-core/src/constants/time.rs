//! Time-Related Constants
//!
//! Cycle cadence, calibration window and the conversion factors used to
//! turn centimetres per millisecond into engineering units.

// ===== UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Centimetres per metre.
pub const CM_PER_METER: f32 = 100.0;

// ===== CADENCE =====

/// Fixed polling cycle (milliseconds).
///
/// 20 Hz keeps stop latency under one human reaction time while giving the
/// ultrasonic echo (≤30 ms) room to settle between pings.
pub const LOOP_INTERVAL_MS: u64 = 50;

// ===== CALIBRATION =====

/// Length of the calibration window (milliseconds).
pub const CALIBRATION_WINDOW_MS: u64 = 3_000;

/// Minimum share of calibration samples that must be valid.
///
/// Below this the stair length is unknown and the system halts.
pub const CALIBRATION_MIN_VALID_FRACTION: f32 = 0.5;

// ===== NUMERIC STABILITY =====

/// Smallest time delta used for differentiation (seconds).
///
/// Deltas below this yield zero speed and acceleration.
pub const DT_EPSILON_S: f32 = 1e-3;
