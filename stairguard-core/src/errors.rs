//! Error Types for Configuration, Calibration and Sensor Faults
//!
//! ## Design Philosophy
//!
//! The engine runs in a fixed-cadence loop on small targets, so errors follow
//! the same rules as the rest of the hot path:
//!
//! 1. **Small Size**: variants carry a few scalars at most.
//! 2. **No Heap Allocation**: only `&'static str` for names.
//! 3. **Copy Semantics**: errors are stored inside [`SystemState`] and
//!    status records, so they must be `Copy`.
//!
//! ## Error Categories
//!
//! ### Configuration
//! - [`ConfigError`]: a threshold or window is nonsensical. Rejected before
//!   the monitor is built.
//!
//! ### Calibration (fatal)
//! - [`CalibrationError`]: the stair length could not be established. The
//!   monitor moves to `Halted` and stays there.
//!
//! ### Sensor (transient)
//! - [`SensorFault`]: a driver could not produce an echo in time. Never
//!   propagated out of the core; it becomes an invalid sample and the
//!   stabilizer falls back to history.
//!
//! ```rust
//! use stairguard_core::{MonitorConfig, ConfigError};
//!
//! let config = MonitorConfig::default().with_fall_speed_threshold(-1.0);
//! assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold { .. })));
//! ```
//!
//! [`SystemState`]: crate::lifecycle::SystemState

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Rejected configuration values
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Threshold, width or window is non-positive or not a number
    #[error("Invalid {name}: {value}")]
    InvalidThreshold {
        /// Name of the offending field
        name: &'static str,
        /// Value supplied
        value: f32,
    },

    /// Validity band is empty or inverted
    #[error("Invalid range [{min}, {max}]")]
    InvalidRange {
        /// Lower bound supplied
        min: f32,
        /// Upper bound supplied
        max: f32,
    },

    /// Fraction or factor outside its allowed interval
    #[error("Invalid fraction {name}: {value}")]
    InvalidFraction {
        /// Name of the offending field
        name: &'static str,
        /// Value supplied
        value: f32,
    },
}

/// Why calibration failed. Carried by `SystemState::Halted`.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationError {
    /// Too few valid samples in the window
    #[error("Insufficient calibration samples: need {required}, have {available}")]
    InsufficientSamples {
        /// Minimum valid samples needed
        required: u32,
        /// Valid samples collected
        available: u32,
    },

    /// Mean of the valid samples is not a usable length
    #[error("Calibrated stair length {length} is not positive")]
    NonPositiveLength {
        /// Computed mean
        length: f32,
    },

    /// Stop control pressed mid-window
    #[error("Calibration aborted by stop control")]
    Aborted,
}

/// Driver-level acquisition failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// No echo within the timeout bound
    #[error("Echo timeout")]
    Timeout,

    /// Echo line never went high after the trigger
    #[error("No echo")]
    NoEcho,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InsufficientSamples { required, available } =>
                defmt::write!(fmt, "Need {} valid samples, have {}", required, available),
            Self::NonPositiveLength { length } =>
                defmt::write!(fmt, "Stair length {} not positive", length),
            Self::Aborted =>
                defmt::write!(fmt, "Calibration aborted"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorFault {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Timeout => defmt::write!(fmt, "Echo timeout"),
            Self::NoEcho => defmt::write!(fmt, "No echo"),
        }
    }
}
