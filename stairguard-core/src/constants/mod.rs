//! Constants for StairGuard Core
//!
//! Centralized, documented constants used throughout the fall-detection
//! engine. Every numeric value carries its unit in the name.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Sensors**: Range sensor validity band and timeout bound
//! - **Buffers**: Compile-time ring buffer capacities
//! - **Thresholds**: Fall classification and zone widths
//! - **Time**: Cycle cadence, calibration window and unit conversions
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Tunable thresholds are defaults only - installations override them
//!    through [`MonitorConfig`](crate::config::MonitorConfig)
//! 3. Buffer capacities are not tunable at runtime

/// Range sensor specifications and validity limits.
pub mod sensors;

/// Ring buffer capacities for distance and kinematic history.
pub mod buffers;

/// Fall classification thresholds and stair zone widths.
pub mod thresholds;

/// Cycle timing, calibration window and unit conversions.
pub mod time;

// Re-export commonly used constants for convenience
pub use sensors::{MIN_VALID_DISTANCE_CM, MAX_VALID_DISTANCE_CM, SENSOR_TIMEOUT_US};

pub use buffers::{DEBOUNCE_DEPTH, CONSECUTIVE_READINGS, MAX_INTENTS_PER_CYCLE};

pub use thresholds::{
    FALL_SPEED_THRESHOLD_M_S, UPWARD_SPEED_FACTOR,
    ACCEL_THRESHOLD_M_S2, ACCEL_RELAX_FACTOR,
    SUDDEN_DROP_THRESHOLD_CM, TOP_ZONE_WIDTH_CM, BOTTOM_ZONE_WIDTH_CM,
};

pub use time::{
    MS_PER_SECOND, CM_PER_METER, LOOP_INTERVAL_MS,
    CALIBRATION_WINDOW_MS, CALIBRATION_MIN_VALID_FRACTION, DT_EPSILON_S,
};
