//! Cooperative driver tying the monitor to its collaborators
//!
//! [`StairGuard`] owns a [`Monitor`] and the five external parties: range
//! sensor, actuator, alert driver, status sink and clock. One call to
//! [`StairGuard::run_cycle`] is one `LOOP_INTERVAL` of work. It never
//! sleeps; the caller's scheduler decides when the next cycle runs.
//!
//! ```rust
//! use stairguard_core::{
//!     StairGuard, Monitor, MonitorConfig,
//!     events::{AlertPattern, DeployReason, KinematicSnapshot},
//!     errors::SensorFault,
//!     time::ManualClock,
//!     traits::{Actuator, AlertDriver, NullSink, RangeSensor},
//! };
//!
//! struct Echo(f32);
//! impl RangeSensor for Echo {
//!     type Error = SensorFault;
//!     fn measure(&mut self) -> nb::Result<f32, SensorFault> { Ok(self.0) }
//! }
//!
//! struct Servo;
//! impl Actuator for Servo {
//!     fn deploy(&mut self, _: DeployReason, _: KinematicSnapshot) {}
//!     fn retract(&mut self) {}
//! }
//!
//! struct Leds;
//! impl AlertDriver for Leds {
//!     fn alert_on(&mut self, _: AlertPattern) {}
//!     fn alert_off(&mut self) {}
//! }
//!
//! let monitor = Monitor::calibrated(MonitorConfig::default(), 150.0)?;
//! let mut guard = StairGuard::new(monitor, Echo(90.0), Servo, Leds, NullSink, ManualClock::new(0));
//!
//! guard.run_cycle(None);
//! assert!(!guard.is_halted());
//! # Ok::<(), stairguard_core::ConfigError>(())
//! ```

use crate::{
    events::{CycleReport, Intent, StopResumeEvent},
    lifecycle::{Monitor, SystemState},
    time::TimeSource,
    traits::{Actuator, AlertDriver, RangeSensor, StatusSink},
};

/// Monitor plus its hardware collaborators
pub struct StairGuard<S, A, L, K, C> {
    monitor: Monitor,
    sensor: S,
    actuator: A,
    alert: L,
    sink: K,
    clock: C,
}

impl<S, A, L, K, C> StairGuard<S, A, L, K, C>
where
    S: RangeSensor,
    A: Actuator,
    L: AlertDriver,
    K: StatusSink,
    C: TimeSource,
{
    /// Wire a monitor to its drivers
    pub fn new(monitor: Monitor, sensor: S, actuator: A, alert: L, sink: K, clock: C) -> Self {
        Self {
            monitor,
            sensor,
            actuator,
            alert,
            sink,
            clock,
        }
    }

    /// Run one cycle and dispatch everything it produced
    pub fn run_cycle(&mut self, event: Option<StopResumeEvent>) -> CycleReport {
        let now = self.clock.now();
        let report = self.monitor.tick(now, event, &mut self.sensor);

        for intent in report.intents.iter() {
            match *intent {
                Intent::Deploy { reason, snapshot } => self.actuator.deploy(reason, snapshot),
                Intent::Retract => self.actuator.retract(),
                Intent::AlertOn(pattern) => self.alert.alert_on(pattern),
                Intent::AlertOff => self.alert.alert_off(),
            }
        }

        self.sink.record(&report.status);
        report
    }

    /// Current state
    pub fn state(&self) -> SystemState {
        self.monitor.state()
    }

    /// Whether the loop can stop; halted monitors never recover
    pub fn is_halted(&self) -> bool {
        self.monitor.state().is_halted()
    }

    /// Session state
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Clock, mutable so replays can advance it between cycles
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Sensor, mutable for drivers that need re-arming
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Status sink
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Alert driver
    pub fn alert(&self) -> &L {
        &self.alert
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (Monitor, S, A, L, K, C) {
        (self.monitor, self.sensor, self.actuator, self.alert, self.sink, self.clock)
    }
}
