//! Fall Classification Thresholds
//!
//! Defaults tuned for a residential straight flight (~150 cm sensor to
//! bottom landing). Installations calibrate these empirically.

// ===== SPEED =====

/// Sustained descending speed that indicates a forward fall (m/s).
///
/// Normal descent on stairs stays well under this at the sensor's
/// line of sight.
pub const FALL_SPEED_THRESHOLD_M_S: f32 = 0.5;

/// Multiplier on the speed threshold for the upward (backward fall) criterion.
///
/// Quick ascent is common, so the upward criterion is stricter.
pub const UPWARD_SPEED_FACTOR: f32 = 1.2;

// ===== ACCELERATION =====

/// Sustained |acceleration| that indicates uncontrolled movement (m/s²).
pub const ACCEL_THRESHOLD_M_S2: f32 = 5.0;

/// Fraction of `ACCEL_THRESHOLD_M_S2` the current sample must still exceed.
pub const ACCEL_RELAX_FACTOR: f32 = 0.8;

// ===== DISCONTINUITY =====

/// Single-cycle distance increase that indicates free fall (cm).
pub const SUDDEN_DROP_THRESHOLD_CM: f32 = 30.0;

// ===== ZONES =====

/// Width of the top landing zone measured from the sensor (cm).
pub const TOP_ZONE_WIDTH_CM: f32 = 20.0;

/// Half-width of the bottom landing zone around the calibrated length (cm).
pub const BOTTOM_ZONE_WIDTH_CM: f32 = 8.0;
