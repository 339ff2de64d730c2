//! Seams to the hardware collaborators
//!
//! The engine drives four external parties. Each gets a small trait so the
//! same core runs against real drivers, a replay file or a test double.
//!
//! ## Sensor acquisition
//!
//! [`RangeSensor::measure`] follows the `nb` convention. The core calls it
//! once per cycle and never spins: `WouldBlock` means the echo is not back
//! yet, which for a fixed-cadence loop is the same as a timeout. Both become
//! an invalid [`RangeSample`](crate::stabilizer::RangeSample).
//!
//! ```rust
//! use stairguard_core::traits::RangeSensor;
//! use stairguard_core::errors::SensorFault;
//!
//! struct Fixed(f32);
//!
//! impl RangeSensor for Fixed {
//!     type Error = SensorFault;
//!
//!     fn measure(&mut self) -> nb::Result<f32, Self::Error> {
//!         Ok(self.0)
//!     }
//! }
//! ```

use crate::events::{AlertPattern, CycleStatus, DeployReason, KinematicSnapshot};

/// Time-of-flight range sensor
pub trait RangeSensor {
    /// Driver-specific failure
    type Error: core::fmt::Debug;

    /// Take one reading in centimetres
    ///
    /// Must return within the driver's timeout bound. Returns
    /// `Err(nb::Error::WouldBlock)` rather than waiting for a late echo.
    fn measure(&mut self) -> nb::Result<f32, Self::Error>;
}

/// Cushion deployment mechanism
///
/// Fire-and-forget: the core does not wait for physical confirmation.
pub trait Actuator {
    /// Deploy the cushion
    fn deploy(&mut self, reason: DeployReason, snapshot: KinematicSnapshot);

    /// Retract the cushion
    fn retract(&mut self);
}

/// Visual/audible alert output
pub trait AlertDriver {
    /// Start a pattern, replacing any running one
    fn alert_on(&mut self, pattern: AlertPattern);

    /// Silence everything
    fn alert_off(&mut self);
}

/// Consumer of per-cycle status records
pub trait StatusSink {
    /// Record one completed cycle
    fn record(&mut self, status: &CycleStatus);
}

/// Sink that drops every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn record(&mut self, _status: &CycleStatus) {}
}
