//! Intents and Status Records Emitted by the Monitor
//!
//! ## Overview
//!
//! The monitor never touches hardware. Each cycle it produces:
//!
//! - zero to [`MAX_INTENTS_PER_CYCLE`] [`Intent`]s for the actuator and
//!   alert drivers, raised on state *entry* only, and
//! - exactly one [`CycleStatus`] for the status sink.
//!
//! ```text
//! Monitor::tick ──→ CycleReport ─┬─→ intents ──→ Actuator / AlertDriver
//!                                └─→ status  ──→ StatusSink
//! ```
//!
//! Everything here is `Copy` and sized for the stack. String rendering is
//! limited to short `label()`s; formatting belongs to the status sink.

use heapless::Vec;

use crate::{
    classifier::FallVerdict,
    constants::buffers::MAX_INTENTS_PER_CYCLE,
    lifecycle::SystemState,
    time::Timestamp,
    zone::Zone,
};

/// One debounced press of the stop/resume control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StopResumeEvent;

/// Why the cushion is being deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeployReason {
    /// Automatic detection with its cause
    Fall(FallVerdict),
    /// Operator pressed stop
    ManualStop,
}

/// Visual/audible alert pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertPattern {
    /// Fast red strobe with siren
    FallDetected,
    /// Steady amber, single chirp
    ManualStop,
    /// Slow red blink; system halted and not monitoring
    Fault,
}

/// Kinematic state at the moment an intent was raised
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KinematicSnapshot {
    /// Stable distance (cm)
    pub distance: f32,
    /// Signed speed (m/s), positive = descending
    pub speed: f32,
    /// Signed acceleration (m/s²)
    pub acceleration: f32,
    /// Distance change over one loop interval (cm)
    pub distance_change: f32,
}

/// Discrete command for an external driver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    /// Deploy the cushion
    Deploy {
        /// Cause of deployment
        reason: DeployReason,
        /// Kinematics at deployment
        snapshot: KinematicSnapshot,
    },
    /// Retract the cushion
    Retract,
    /// Start an alert pattern
    AlertOn(AlertPattern),
    /// Stop any alert
    AlertOff,
}

/// Intents raised by one cycle
pub type Intents = Vec<Intent, MAX_INTENTS_PER_CYCLE>;

/// Per-cycle status record for logging and telemetry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleStatus {
    /// When the cycle ran
    pub timestamp: Timestamp,
    /// Stable distance, `None` until a sample has been taken this session
    pub distance: Option<f32>,
    /// False when the distance is the raw fallback of an all-invalid window
    pub reliable: bool,
    /// Signed speed (m/s)
    pub speed: f32,
    /// Signed acceleration (m/s²)
    pub acceleration: f32,
    /// Distance change over one loop interval (cm)
    pub distance_change: f32,
    /// Zone of the stable distance
    pub zone: Zone,
    /// Verdict of this cycle
    pub verdict: FallVerdict,
    /// State after the cycle
    pub state: SystemState,
    /// Fall warnings since the last resume
    pub warnings: u16,
}

impl CycleStatus {
    /// Snapshot of the kinematic fields
    pub fn snapshot(&self) -> KinematicSnapshot {
        KinematicSnapshot {
            distance: self.distance.unwrap_or(0.0),
            speed: self.speed,
            acceleration: self.acceleration,
            distance_change: self.distance_change,
        }
    }
}

/// Everything one cycle produced
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Commands for external drivers, in dispatch order
    pub intents: Intents,
    /// Status record for the sink
    pub status: CycleStatus,
}

impl CycleReport {
    /// Whether the cycle changed the actuator or alert state
    pub fn has_intents(&self) -> bool {
        !self.intents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_fit_on_stack() {
        assert!(core::mem::size_of::<Intent>() <= 32);
        assert!(core::mem::size_of::<CycleStatus>() <= 64);
    }

    #[test]
    fn snapshot_copies_kinematics() {
        let status = CycleStatus {
            timestamp: 1000,
            distance: Some(140.0),
            reliable: true,
            speed: 0.9,
            acceleration: 2.0,
            distance_change: 4.5,
            zone: Zone::Mid,
            verdict: FallVerdict::SpeedDown,
            state: SystemState::FallResponse(FallVerdict::SpeedDown),
            warnings: 1,
        };

        let snapshot = status.snapshot();
        assert_eq!(snapshot.distance, 140.0);
        assert_eq!(snapshot.speed, 0.9);
        assert_eq!(snapshot.distance_change, 4.5);
    }
}
