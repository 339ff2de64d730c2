//! Monitor configuration
//!
//! Every tunable threshold lives in [`MonitorConfig`]. Defaults come from
//! [`constants`](crate::constants); an installation overrides the ones it
//! has calibrated for its staircase:
//!
//! ```rust
//! use stairguard_core::MonitorConfig;
//!
//! let config = MonitorConfig::default()
//!     .with_fall_speed_threshold(0.6)
//!     .with_zone_widths(25.0, 10.0);
//! assert!(config.validate().is_ok());
//! ```

use crate::{
    constants::{
        sensors::{MIN_VALID_DISTANCE_CM, MAX_VALID_DISTANCE_CM, SENSOR_TIMEOUT_US},
        thresholds::{
            FALL_SPEED_THRESHOLD_M_S, UPWARD_SPEED_FACTOR, ACCEL_THRESHOLD_M_S2,
            ACCEL_RELAX_FACTOR, SUDDEN_DROP_THRESHOLD_CM, TOP_ZONE_WIDTH_CM,
            BOTTOM_ZONE_WIDTH_CM,
        },
        time::{
            LOOP_INTERVAL_MS, CALIBRATION_WINDOW_MS, CALIBRATION_MIN_VALID_FRACTION,
            DT_EPSILON_S,
        },
    },
    errors::{ConfigError, ConfigResult},
};

/// Thresholds and windows for one installation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorConfig {
    /// Lower bound of the sensor validity band (cm)
    pub min_valid_distance_cm: f32,
    /// Upper bound of the sensor validity band (cm)
    pub max_valid_distance_cm: f32,
    /// Top landing zone width from the sensor (cm)
    pub top_zone_width_cm: f32,
    /// Bottom landing half-width around the stair length (cm)
    pub bottom_zone_width_cm: f32,
    /// Sustained downward speed for a forward fall (m/s)
    pub fall_speed_threshold: f32,
    /// Multiplier applied to `fall_speed_threshold` for upward motion
    pub upward_speed_factor: f32,
    /// Sustained |acceleration| for uncontrolled movement (m/s²)
    pub accel_threshold: f32,
    /// Share of `accel_threshold` the current sample must exceed
    pub accel_relax_factor: f32,
    /// Single-cycle distance increase for a sudden drop (cm)
    pub sudden_drop_threshold_cm: f32,
    /// Polling cadence (ms); distance changes are normalized to one interval
    pub loop_interval_ms: u64,
    /// Calibration window length (ms)
    pub calibration_window_ms: u64,
    /// Minimum valid share of calibration samples
    pub calibration_min_valid_fraction: f32,
    /// Smallest usable time delta (s)
    pub dt_epsilon_s: f32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            min_valid_distance_cm: MIN_VALID_DISTANCE_CM,
            max_valid_distance_cm: MAX_VALID_DISTANCE_CM,
            top_zone_width_cm: TOP_ZONE_WIDTH_CM,
            bottom_zone_width_cm: BOTTOM_ZONE_WIDTH_CM,
            fall_speed_threshold: FALL_SPEED_THRESHOLD_M_S,
            upward_speed_factor: UPWARD_SPEED_FACTOR,
            accel_threshold: ACCEL_THRESHOLD_M_S2,
            accel_relax_factor: ACCEL_RELAX_FACTOR,
            sudden_drop_threshold_cm: SUDDEN_DROP_THRESHOLD_CM,
            loop_interval_ms: LOOP_INTERVAL_MS,
            calibration_window_ms: CALIBRATION_WINDOW_MS,
            calibration_min_valid_fraction: CALIBRATION_MIN_VALID_FRACTION,
            dt_epsilon_s: DT_EPSILON_S,
        }
    }
}

impl MonitorConfig {
    /// Set the sensor validity band
    pub fn with_valid_range(mut self, min_cm: f32, max_cm: f32) -> Self {
        self.min_valid_distance_cm = min_cm;
        self.max_valid_distance_cm = max_cm;
        self
    }

    /// Set top and bottom zone widths
    pub fn with_zone_widths(mut self, top_cm: f32, bottom_cm: f32) -> Self {
        self.top_zone_width_cm = top_cm;
        self.bottom_zone_width_cm = bottom_cm;
        self
    }

    /// Set the downward fall speed threshold
    pub fn with_fall_speed_threshold(mut self, m_per_s: f32) -> Self {
        self.fall_speed_threshold = m_per_s;
        self
    }

    /// Set the upward speed multiplier
    pub fn with_upward_speed_factor(mut self, factor: f32) -> Self {
        self.upward_speed_factor = factor;
        self
    }

    /// Set the acceleration threshold and its relaxed share for the current sample
    pub fn with_accel_threshold(mut self, m_per_s2: f32, relax_factor: f32) -> Self {
        self.accel_threshold = m_per_s2;
        self.accel_relax_factor = relax_factor;
        self
    }

    /// Set the sudden drop threshold
    pub fn with_sudden_drop_threshold(mut self, cm: f32) -> Self {
        self.sudden_drop_threshold_cm = cm;
        self
    }

    /// Set the polling cadence
    pub fn with_loop_interval(mut self, ms: u64) -> Self {
        self.loop_interval_ms = ms;
        self
    }

    /// Set calibration window and minimum valid share
    pub fn with_calibration(mut self, window_ms: u64, min_valid_fraction: f32) -> Self {
        self.calibration_window_ms = window_ms;
        self.calibration_min_valid_fraction = min_valid_fraction;
        self
    }

    /// Threshold for the upward (backward fall) criterion, as a negative speed
    pub fn upward_speed_threshold(&self) -> f32 {
        -self.upward_speed_factor * self.fall_speed_threshold
    }

    /// Threshold the current acceleration sample must exceed
    pub fn relaxed_accel_threshold(&self) -> f32 {
        self.accel_relax_factor * self.accel_threshold
    }

    /// Check every field for physical sense
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.min_valid_distance_cm.is_finite()
            || !self.max_valid_distance_cm.is_finite()
            || self.min_valid_distance_cm < 0.0
            || self.min_valid_distance_cm >= self.max_valid_distance_cm
        {
            return Err(ConfigError::InvalidRange {
                min: self.min_valid_distance_cm,
                max: self.max_valid_distance_cm,
            });
        }

        positive("top_zone_width_cm", self.top_zone_width_cm)?;
        positive("bottom_zone_width_cm", self.bottom_zone_width_cm)?;
        positive("fall_speed_threshold", self.fall_speed_threshold)?;
        positive("accel_threshold", self.accel_threshold)?;
        positive("sudden_drop_threshold_cm", self.sudden_drop_threshold_cm)?;
        positive("dt_epsilon_s", self.dt_epsilon_s)?;
        positive("loop_interval_ms", self.loop_interval_ms as f32)?;
        positive("calibration_window_ms", self.calibration_window_ms as f32)?;

        // One echo wait must fit inside a cycle
        if self.loop_interval_ms.saturating_mul(1000) < SENSOR_TIMEOUT_US as u64 {
            return Err(ConfigError::InvalidThreshold {
                name: "loop_interval_ms",
                value: self.loop_interval_ms as f32,
            });
        }

        // Upward criterion must never be laxer than the downward one
        if !self.upward_speed_factor.is_finite() || self.upward_speed_factor < 1.0 {
            return Err(ConfigError::InvalidFraction {
                name: "upward_speed_factor",
                value: self.upward_speed_factor,
            });
        }

        unit_fraction("accel_relax_factor", self.accel_relax_factor)?;
        unit_fraction("calibration_min_valid_fraction", self.calibration_min_valid_fraction)?;

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

/// Accepts (0, 1]
fn unit_fraction(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFraction { name, value })
    }
}
