//! Fall-detection engine for StairGuard
//!
//! Infers whether a person on a staircase is falling from a single noisy
//! range sensor mounted at the top of the flight, and decides when to deploy
//! the cushion. Designed for microcontrollers.
//!
//! Key constraints:
//! - No heap allocation; all history lives in fixed ring buffers
//! - One cycle per `LOOP_INTERVAL`, no blocking inside the core
//! - Deterministic threshold logic, unit testable by tick injection
//!
//! Pipeline per cycle:
//!
//! ```text
//! RangeSample → stabilizer → StableDistance ─┬→ zone ─────────┐
//!                                            └→ kinematics ───┴→ classifier → lifecycle → intents
//! ```
//!
//! ```no_run
//! use stairguard_core::{Monitor, MonitorConfig, StopResumeEvent};
//! # use stairguard_core::{errors::SensorFault, traits::RangeSensor};
//! # struct Echo;
//! # impl RangeSensor for Echo {
//! #     type Error = SensorFault;
//! #     fn measure(&mut self) -> nb::Result<f32, SensorFault> { Ok(120.0) }
//! # }
//! # fn now_ms() -> u64 { 0 }
//! # fn button_pressed() -> bool { false }
//! let mut monitor = Monitor::new(MonitorConfig::default()).unwrap();
//! let mut sensor = Echo;
//!
//! loop {
//!     let event = button_pressed().then_some(StopResumeEvent);
//!     let report = monitor.tick(now_ms(), event, &mut sensor);
//!     for _intent in report.intents.iter() {
//!         // hand to actuator / alert drivers
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod guard;
pub mod kinematics;
pub mod lifecycle;
pub mod stabilizer;
pub mod time;
pub mod traits;
pub mod zone;

// Public API
pub use classifier::{FallClassifier, FallInput, FallVerdict};
pub use config::MonitorConfig;
pub use errors::{CalibrationError, ConfigError, ConfigResult, SensorFault};
pub use events::{CycleReport, CycleStatus, Intent, StopResumeEvent};
pub use guard::StairGuard;
pub use kinematics::{KinematicHistory, KinematicsEstimator};
pub use lifecycle::{Monitor, SystemState};
pub use stabilizer::{DistanceStabilizer, RangeSample, StableDistance};
pub use zone::{Zone, ZoneClassifier};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
