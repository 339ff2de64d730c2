//! Common test utilities for integration tests
//!
//! This module provides:
//! - A scripted range sensor with timeouts and dropouts
//! - Recording doubles for the actuator, alert driver and status sink
//! - Helpers to drive a monitor tick by tick on a fixed cadence

#![allow(dead_code)]

use std::collections::VecDeque;

use stairguard_core::{
    constants::time::LOOP_INTERVAL_MS,
    errors::SensorFault,
    events::{AlertPattern, CycleReport, CycleStatus, DeployReason, KinematicSnapshot},
    time::Timestamp,
    traits::{Actuator, AlertDriver, RangeSensor, StatusSink},
    Monitor, MonitorConfig, StopResumeEvent,
};

pub mod generators;

/// Range sensor fed from a queue; repeats the last reading when drained
pub struct ScriptedSensor {
    queue: VecDeque<Option<f32>>,
    hold: Option<f32>,
    pub reads: usize,
}

impl ScriptedSensor {
    pub fn new() -> Self {
        Self { queue: VecDeque::new(), hold: None, reads: 0 }
    }

    pub fn constant(distance: f32) -> Self {
        let mut sensor = Self::new();
        sensor.hold = Some(distance);
        sensor
    }

    /// Queue readings; `None` is a timeout
    pub fn feed(&mut self, readings: impl IntoIterator<Item = Option<f32>>) {
        self.queue.extend(readings);
    }

    /// Queue valid readings
    pub fn feed_distances(&mut self, distances: &[f32]) {
        self.feed(distances.iter().map(|d| Some(*d)));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl RangeSensor for ScriptedSensor {
    type Error = SensorFault;

    fn measure(&mut self) -> nb::Result<f32, SensorFault> {
        self.reads += 1;
        let reading = match self.queue.pop_front() {
            Some(reading) => {
                self.hold = reading;
                reading
            }
            None => self.hold,
        };
        reading.ok_or(nb::Error::Other(SensorFault::Timeout))
    }
}

/// Sensor that never has an echo ready
pub struct NeverReady;

impl RangeSensor for NeverReady {
    type Error = SensorFault;

    fn measure(&mut self) -> nb::Result<f32, SensorFault> {
        Err(nb::Error::WouldBlock)
    }
}

#[derive(Default)]
pub struct RecordingActuator {
    pub deploys: Vec<(DeployReason, KinematicSnapshot)>,
    pub retracts: usize,
}

impl Actuator for RecordingActuator {
    fn deploy(&mut self, reason: DeployReason, snapshot: KinematicSnapshot) {
        self.deploys.push((reason, snapshot));
    }

    fn retract(&mut self) {
        self.retracts += 1;
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub patterns: Vec<AlertPattern>,
    pub offs: usize,
    pub active: Option<AlertPattern>,
}

impl AlertDriver for RecordingAlerts {
    fn alert_on(&mut self, pattern: AlertPattern) {
        self.patterns.push(pattern);
        self.active = Some(pattern);
    }

    fn alert_off(&mut self) {
        self.offs += 1;
        self.active = None;
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub records: Vec<CycleStatus>,
}

impl StatusSink for RecordingSink {
    fn record(&mut self, status: &CycleStatus) {
        self.records.push(*status);
    }
}

/// Config with a one second calibration window
pub fn test_config() -> MonitorConfig {
    MonitorConfig::default().with_calibration(1_000, 0.5)
}

/// Monitor already calibrated for a 150 cm flight
pub fn calibrated_monitor() -> Monitor {
    Monitor::calibrated(test_config(), 150.0).expect("valid test config")
}

/// Drives a monitor on the fixed cadence and keeps every report
pub struct Driver {
    pub monitor: Monitor,
    pub sensor: ScriptedSensor,
    pub now: Timestamp,
    pub reports: Vec<CycleReport>,
}

impl Driver {
    pub fn new(monitor: Monitor, sensor: ScriptedSensor) -> Self {
        Self { monitor, sensor, now: 0, reports: Vec::new() }
    }

    /// One tick, advancing the clock afterwards
    pub fn tick(&mut self, event: Option<StopResumeEvent>) -> CycleReport {
        let report = self.monitor.tick(self.now, event, &mut self.sensor);
        self.now += LOOP_INTERVAL_MS;
        self.reports.push(report.clone());
        report
    }

    /// Tick until the sensor queue is drained or the monitor stops reading it
    pub fn drain(&mut self) {
        while self.sensor.pending() > 0 && self.reads_sensor() {
            self.tick(None);
        }
    }

    fn reads_sensor(&self) -> bool {
        let state = self.monitor.state();
        !state.is_deployed() && !state.is_halted()
    }

    pub fn press(&mut self) -> CycleReport {
        self.tick(Some(StopResumeEvent))
    }

    pub fn deploy_count(&self) -> usize {
        self.reports
            .iter()
            .flat_map(|r| r.intents.iter())
            .filter(|i| matches!(i, stairguard_core::Intent::Deploy { .. }))
            .count()
    }
}
