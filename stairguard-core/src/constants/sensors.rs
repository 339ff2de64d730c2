//! Range Sensor Specifications and Limits
//!
//! Operational limits for the ultrasonic time-of-flight sensor mounted at
//! the top of the staircase, facing down the flight.

// ===== VALIDITY BAND =====

/// Minimum trustworthy distance (cm).
///
/// Below this the echo overlaps the trigger burst and the reading is noise.
///
/// Source: HC-SR04 class datasheets (2 cm blind zone)
pub const MIN_VALID_DISTANCE_CM: f32 = 2.0;

/// Maximum trustworthy distance (cm).
///
/// Beyond this the echo is too weak and the sensor returns garbage or
/// nothing at all.
///
/// Source: HC-SR04 class datasheets (400 cm rated range)
pub const MAX_VALID_DISTANCE_CM: f32 = 400.0;

// ===== ACQUISITION =====

/// Upper bound on a single echo wait (microseconds).
///
/// Round trip for MAX_VALID_DISTANCE_CM is ~23.5 ms at 343 m/s, so 30 ms
/// leaves margin while keeping the cycle cadence intact. Drivers that hit
/// this bound report a timeout, which becomes an invalid sample.
///
/// `MonitorConfig::validate` rejects loop intervals shorter than this.
pub const SENSOR_TIMEOUT_US: u32 = 30_000;
