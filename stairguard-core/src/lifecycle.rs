//! Lifecycle State Machine
//!
//! ## Overview
//!
//! [`Monitor`] is the session object. It owns the distance and kinematic
//! history, the calibrated stair length and the current [`SystemState`], and
//! it is the only thing that mutates them. The caller drives it one tick per
//! `LOOP_INTERVAL`; nothing here sleeps or blocks.
//!
//! ```text
//!                 ┌─────────────┐ window ok  ┌────────────┐  verdict   ┌──────────────┐
//!   start ──────→ │ Calibrating │ ─────────→ │ Monitoring │ ─────────→ │ FallResponse │
//!                 └─────────────┘            └────────────┘            └──────────────┘
//!                   │ too few valid /          │  ↑      │ stop             │ resume
//!                   │ stop pressed             │  │      ↓                  ↓
//!                   ↓                          │  │  ┌─────────────────┐  ┌──────────┐
//!                 ┌────────┐                   │  └──│    Resuming     │←─│ Manually │
//!                 │ Halted │                   │     │ (grace, M valid)│  │ Stopped  │
//!                 └────────┘                   │     └─────────────────┘  └──────────┘
//!                                              └──── stop ───────────────────→ ↑
//! ```
//!
//! ## Cycle Order
//!
//! 1. The stop/resume edge is consumed first. A stop never waits for
//!    sensor work, so stop latency is at most one tick.
//! 2. Sensor sample → stabilizer → zone → kinematics (skipped when the
//!    stable distance is unreliable) → fall classifier (Monitoring only,
//!    Mid zone only).
//! 3. One [`CycleReport`] is returned: intents raised on state entry plus a
//!    status record.
//!
//! ## Actuation Edges
//!
//! Deploy and alert intents are raised exactly once, on entry to
//! FallResponse or ManuallyStopped. Those states do no sensor work, so
//! nothing can re-fire until a resume passes through Resuming.

use libm::ceilf;

use crate::{
    classifier::{FallClassifier, FallInput, FallVerdict},
    config::MonitorConfig,
    constants::buffers::CONSECUTIVE_READINGS,
    errors::{CalibrationError, ConfigError, ConfigResult},
    events::{
        AlertPattern, CycleReport, CycleStatus, DeployReason, Intent, Intents,
        KinematicSnapshot, StopResumeEvent,
    },
    kinematics::{KinematicHistory, KinematicsEstimator},
    stabilizer::{DistanceStabilizer, RangeSample, StableDistance},
    time::{elapsed_secs, Timestamp},
    traits::RangeSensor,
    zone::{Zone, ZoneClassifier},
};

/// Operating state of the monitor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemState {
    /// Measuring the stair length
    Calibrating,
    /// Fall detection active
    Monitoring,
    /// Fall detected, cushion deployed, waiting for resume
    FallResponse(FallVerdict),
    /// Operator stop, cushion deployed, waiting for resume
    ManuallyStopped,
    /// Grace period after resume
    Resuming,
    /// Calibration failed; terminal
    Halted(CalibrationError),
}

impl SystemState {
    /// Short label for status output
    pub const fn label(&self) -> &'static str {
        match self {
            SystemState::Calibrating => "calibrating",
            SystemState::Monitoring => "monitoring",
            SystemState::FallResponse(_) => "fall_response",
            SystemState::ManuallyStopped => "manually_stopped",
            SystemState::Resuming => "resuming",
            SystemState::Halted(_) => "halted",
        }
    }

    /// Terminal state
    pub const fn is_halted(&self) -> bool {
        matches!(self, SystemState::Halted(_))
    }

    /// Cushion is out and the monitor waits for resume
    pub const fn is_deployed(&self) -> bool {
        matches!(self, SystemState::FallResponse(_) | SystemState::ManuallyStopped)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SystemState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::FallResponse(verdict) => defmt::write!(fmt, "fall_response({})", verdict),
            Self::Halted(reason) => defmt::write!(fmt, "halted({})", reason),
            other => defmt::write!(fmt, "{}", other.label()),
        }
    }
}

/// Running tally for the calibration window
#[derive(Debug, Clone, Copy, Default)]
struct Calibration {
    started_at: Option<Timestamp>,
    attempted: u32,
    valid: u32,
    sum_cm: f32,
}

impl Calibration {
    fn add(&mut self, sample: RangeSample) {
        self.attempted = self.attempted.saturating_add(1);
        if sample.valid {
            self.valid = self.valid.saturating_add(1);
            self.sum_cm += sample.distance;
        }
    }

    /// Stair length from the collected samples
    fn finish(&self, min_valid_fraction: f32) -> Result<f32, CalibrationError> {
        let required = (ceilf(self.attempted as f32 * min_valid_fraction) as u32).max(1);
        if self.valid < required {
            return Err(CalibrationError::InsufficientSamples {
                required,
                available: self.valid,
            });
        }

        let length = self.sum_cm / self.valid as f32;
        if !(length.is_finite() && length > 0.0) {
            return Err(CalibrationError::NonPositiveLength { length });
        }
        Ok(length)
    }
}

/// What one sensor cycle measured
#[derive(Debug, Clone, Copy, Default)]
struct Measurement {
    distance: Option<StableDistance>,
    speed: f32,
    acceleration: f32,
    distance_change: f32,
    zone: Zone,
    verdict: FallVerdict,
    has_kinematics: bool,
}

impl Measurement {
    fn snapshot(&self) -> KinematicSnapshot {
        KinematicSnapshot {
            distance: self.distance.map(|d| d.value).unwrap_or(0.0),
            speed: self.speed,
            acceleration: self.acceleration,
            distance_change: self.distance_change,
        }
    }

    fn is_reliable(&self) -> bool {
        self.distance.map(|d| d.reliable).unwrap_or(false)
    }
}

/// Fall-detection session
#[derive(Debug, Clone)]
pub struct Monitor {
    config: MonitorConfig,
    state: SystemState,
    stabilizer: DistanceStabilizer,
    estimator: KinematicsEstimator,
    classifier: FallClassifier,
    history: KinematicHistory,
    calibration: Calibration,
    /// Set once calibration succeeds; never changed afterwards
    zones: Option<ZoneClassifier>,
    /// Last reliable stable distance and when it was taken
    previous: Option<(f32, Timestamp)>,
    /// Zone of the last reliable cycle
    previous_zone: Zone,
    last_distance: Option<StableDistance>,
    last_snapshot: KinematicSnapshot,
    grace_remaining: usize,
    warnings: u16,
}

impl Monitor {
    /// New session starting in `Calibrating`
    pub fn new(config: MonitorConfig) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            state: SystemState::Calibrating,
            stabilizer: DistanceStabilizer::new(),
            estimator: KinematicsEstimator::new(config.dt_epsilon_s),
            classifier: FallClassifier::new(&config),
            history: KinematicHistory::new(),
            calibration: Calibration::default(),
            zones: None,
            previous: None,
            previous_zone: Zone::Mid,
            last_distance: None,
            last_snapshot: KinematicSnapshot::default(),
            grace_remaining: 0,
            warnings: 0,
        })
    }

    /// New session that skips calibration with a known stair length
    ///
    /// For replays of recorded sessions and for tests.
    pub fn calibrated(config: MonitorConfig, stair_length_cm: f32) -> ConfigResult<Self> {
        if !(stair_length_cm.is_finite() && stair_length_cm > 0.0) {
            return Err(ConfigError::InvalidThreshold {
                name: "stair_length_cm",
                value: stair_length_cm,
            });
        }

        let mut monitor = Self::new(config)?;
        monitor.zones = Some(monitor.zone_classifier(stair_length_cm));
        monitor.state = SystemState::Monitoring;
        Ok(monitor)
    }

    /// Current state
    pub fn state(&self) -> SystemState {
        self.state
    }

    /// Configuration in use
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Calibrated stair length, `None` until calibration succeeds
    pub fn stair_length(&self) -> Option<f32> {
        self.zones.map(|z| z.stair_length())
    }

    /// Kinematic history used for sustained-evidence checks
    pub fn history(&self) -> &KinematicHistory {
        &self.history
    }

    /// Fall warnings since the last resume
    pub fn warnings(&self) -> u16 {
        self.warnings
    }

    /// Reliable cycles left before leaving `Resuming`
    pub fn grace_remaining(&self) -> usize {
        self.grace_remaining
    }

    /// Run one cycle
    ///
    /// `event` is the stop/resume edge observed since the previous tick. It
    /// is handled before the sensor is read.
    pub fn tick<S: RangeSensor>(
        &mut self,
        now: Timestamp,
        event: Option<StopResumeEvent>,
        sensor: &mut S,
    ) -> CycleReport {
        let mut intents = Intents::new();

        let measurement = match self.state {
            SystemState::Calibrating => self.calibrating(now, event, sensor, &mut intents),
            SystemState::Monitoring => self.monitoring(now, event, sensor, &mut intents),
            SystemState::Resuming => self.resuming(now, event, sensor, &mut intents),
            SystemState::FallResponse(_) | SystemState::ManuallyStopped => match event {
                Some(_) => self.resume(now, sensor, &mut intents),
                None => Measurement::default(),
            },
            SystemState::Halted(_) => Measurement::default(),
        };

        let distance = measurement.distance.or(self.last_distance);
        let status = CycleStatus {
            timestamp: now,
            distance: distance.map(|d| d.value),
            reliable: distance.map(|d| d.reliable).unwrap_or(false),
            speed: measurement.speed,
            acceleration: measurement.acceleration,
            distance_change: measurement.distance_change,
            zone: measurement.zone,
            verdict: measurement.verdict,
            state: self.state,
            warnings: self.warnings,
        };

        CycleReport { intents, status }
    }

    fn calibrating<S: RangeSensor>(
        &mut self,
        now: Timestamp,
        event: Option<StopResumeEvent>,
        sensor: &mut S,
        intents: &mut Intents,
    ) -> Measurement {
        if event.is_some() {
            log_warn!("stop pressed during calibration");
            self.halt(CalibrationError::Aborted, intents);
            return Measurement::default();
        }

        let started_at = *self.calibration.started_at.get_or_insert(now);
        if now.saturating_sub(started_at) >= self.config.calibration_window_ms {
            self.finish_calibration(intents);
            return Measurement::default();
        }

        let sample = self.acquire(sensor);
        self.calibration.add(sample);

        Measurement {
            distance: Some(StableDistance { value: sample.distance, reliable: sample.valid }),
            ..Measurement::default()
        }
    }

    fn finish_calibration(&mut self, intents: &mut Intents) {
        let calibration = self.calibration;
        match calibration.finish(self.config.calibration_min_valid_fraction) {
            Ok(length) => {
                log_info!(
                    "calibrated stair length {} cm from {}/{} valid samples",
                    length, calibration.valid, calibration.attempted
                );
                self.zones = Some(self.zone_classifier(length));
                self.transition(SystemState::Monitoring);
            }
            Err(reason) => self.halt(reason, intents),
        }
    }

    fn monitoring<S: RangeSensor>(
        &mut self,
        now: Timestamp,
        event: Option<StopResumeEvent>,
        sensor: &mut S,
        intents: &mut Intents,
    ) -> Measurement {
        if event.is_some() {
            self.manual_stop(intents);
            return Measurement::default();
        }

        let mut m = self.sample(now, sensor);
        if m.has_kinematics {
            let input = FallInput {
                speed: m.speed,
                acceleration: m.acceleration,
                distance_change: m.distance_change,
                distance: m.distance.map(|d| d.value).unwrap_or(0.0),
                zone: m.zone,
                previous_zone: self.previous_zone,
            };

            m.verdict = self.classifier.detect(&input, &self.history);
            if m.verdict.is_fall() {
                self.fall_detected(m.verdict, m.snapshot(), intents);
            } else if self.classifier.is_warning(&input) {
                self.warnings = self.warnings.saturating_add(1);
                log_debug!("fall warning #{} speed {} accel {}", self.warnings, m.speed, m.acceleration);
            }
        }

        if m.is_reliable() {
            self.previous_zone = m.zone;
        }
        m
    }

    fn resuming<S: RangeSensor>(
        &mut self,
        now: Timestamp,
        event: Option<StopResumeEvent>,
        sensor: &mut S,
        intents: &mut Intents,
    ) -> Measurement {
        if event.is_some() {
            self.manual_stop(intents);
            return Measurement::default();
        }

        // Grace period: kinematics keep filling, verdict stays None
        let m = self.sample(now, sensor);
        if m.is_reliable() {
            self.previous_zone = m.zone;
            self.grace_remaining = self.grace_remaining.saturating_sub(1);
            if self.grace_remaining == 0 {
                self.transition(SystemState::Monitoring);
            }
        }
        m
    }

    /// Leave FallResponse or ManuallyStopped
    fn resume<S: RangeSensor>(
        &mut self,
        now: Timestamp,
        sensor: &mut S,
        intents: &mut Intents,
    ) -> Measurement {
        push(intents, Intent::Retract);
        push(intents, Intent::AlertOff);

        self.history.reset();
        self.stabilizer.reset();
        self.previous = None;
        self.previous_zone = Zone::Mid;
        self.warnings = 0;
        self.grace_remaining = CONSECUTIVE_READINGS;
        self.transition(SystemState::Resuming);

        // Fresh baseline
        let m = self.sample(now, sensor);
        if m.is_reliable() {
            self.previous_zone = m.zone;
        }
        m
    }

    fn fall_detected(&mut self, verdict: FallVerdict, snapshot: KinematicSnapshot, intents: &mut Intents) {
        if self.state.is_deployed() {
            return;
        }

        log_warn!(
            "fall detected: {} at {} cm, speed {} m/s, accel {} m/s2",
            verdict.label(), snapshot.distance, snapshot.speed, snapshot.acceleration
        );
        push(intents, Intent::Deploy { reason: DeployReason::Fall(verdict), snapshot });
        push(intents, Intent::AlertOn(AlertPattern::FallDetected));
        self.transition(SystemState::FallResponse(verdict));
    }

    fn manual_stop(&mut self, intents: &mut Intents) {
        if self.state.is_deployed() {
            return;
        }

        push(intents, Intent::Deploy {
            reason: DeployReason::ManualStop,
            snapshot: self.last_snapshot,
        });
        push(intents, Intent::AlertOn(AlertPattern::ManualStop));
        self.transition(SystemState::ManuallyStopped);
    }

    fn halt(&mut self, reason: CalibrationError, intents: &mut Intents) {
        log_error!("calibration failed, monitoring disabled: {}", reason);
        push(intents, Intent::AlertOn(AlertPattern::Fault));
        self.transition(SystemState::Halted(reason));
    }

    /// Read, stabilize, classify zone and derive kinematics
    fn sample<S: RangeSensor>(&mut self, now: Timestamp, sensor: &mut S) -> Measurement {
        let raw = self.acquire(sensor);
        let stable = self.stabilizer.stabilize(raw);
        self.last_distance = Some(stable);

        let mut m = Measurement {
            distance: Some(stable),
            zone: self.zones.map(|z| z.classify(stable)).unwrap_or(Zone::Mid),
            ..Measurement::default()
        };

        if !stable.reliable {
            log_debug!("no valid sample in window, skipping kinematics");
            return m;
        }

        if let Some((prev_cm, prev_at)) = self.previous {
            let dt = elapsed_secs(prev_at, now);
            let (speed, acceleration) = self.estimator.derive(prev_cm, stable.value, dt, &mut self.history);
            m.speed = speed;
            m.acceleration = acceleration;
            m.distance_change = self.per_cycle_change(stable.value - prev_cm, prev_at, now);
            m.has_kinematics = true;
        }

        self.previous = Some((stable.value, now));
        self.last_snapshot = m.snapshot();
        m
    }

    /// Distance change normalized to one loop interval
    ///
    /// After dropouts the previous reliable distance can be several cycles
    /// old; movement hidden by the gap must not read as a single-cycle jump.
    fn per_cycle_change(&self, change_cm: f32, since: Timestamp, now: Timestamp) -> f32 {
        let elapsed_ms = now.saturating_sub(since);
        if elapsed_ms > self.config.loop_interval_ms {
            change_cm * self.config.loop_interval_ms as f32 / elapsed_ms as f32
        } else {
            change_cm
        }
    }

    fn acquire<S: RangeSensor>(&self, sensor: &mut S) -> RangeSample {
        RangeSample::acquire(
            sensor,
            self.config.min_valid_distance_cm,
            self.config.max_valid_distance_cm,
        )
    }

    fn zone_classifier(&self, stair_length_cm: f32) -> ZoneClassifier {
        ZoneClassifier::new(
            stair_length_cm,
            self.config.top_zone_width_cm,
            self.config.bottom_zone_width_cm,
        )
    }

    fn transition(&mut self, next: SystemState) {
        log_info!("state {} -> {}", self.state.label(), next.label());
        self.state = next;
    }
}

fn push(intents: &mut Intents, intent: Intent) {
    if intents.push(intent).is_err() {
        log_error!("intent buffer full, dropped {:?}", intent);
    }
}
