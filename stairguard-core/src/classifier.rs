//! Fall Classifier
//!
//! Deterministic threshold logic over the current cycle and the short
//! kinematic history. Four criteria are evaluated in priority order and the
//! first match wins:
//!
//! | # | Verdict            | Sustained window condition            | Current sample condition                 |
//! |---|--------------------|---------------------------------------|------------------------------------------|
//! | 1 | `SpeedDown`        | speed > v_fall                        | speed > v_fall and distance increasing   |
//! | 2 | `SpeedUp`          | speed < -k·v_fall (k ≥ 1)             | -                                        |
//! | 3 | `HighAcceleration` | \|accel\| > a_max                     | \|accel\| > relax·a_max                  |
//! | 4 | `SuddenDrop`       | -                                     | Δd > d_drop, previous zone not Bottom    |
//!
//! "Sustained" means at least `CONSECUTIVE_READINGS - 1` of the last
//! `CONSECUTIVE_READINGS` samples. A single spike never triggers.
//!
//! Detection is gated on the zone: Top and Bottom always return
//! [`FallVerdict::None`]. The classifier has no state and no side effects;
//! the lifecycle state machine decides what to do with the verdict.

use libm::fabsf;

use crate::{
    config::MonitorConfig,
    constants::buffers::CONSECUTIVE_READINGS,
    kinematics::KinematicHistory,
    zone::Zone,
};

/// Samples in the window that must exceed a threshold
pub const SUSTAINED_COUNT: usize = CONSECUTIVE_READINGS - 1;

/// Cause of a detected fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FallVerdict {
    /// No fall
    #[default]
    None,
    /// Forward fall down the stairs
    SpeedDown,
    /// Backward fall up the stairs
    SpeedUp,
    /// Stumble with rapid change of motion
    HighAcceleration,
    /// Discontinuous jump away from the sensor
    SuddenDrop,
}

impl FallVerdict {
    /// Whether this verdict is a fall
    pub const fn is_fall(&self) -> bool {
        !matches!(self, FallVerdict::None)
    }

    /// Short label for status output
    pub const fn label(&self) -> &'static str {
        match self {
            FallVerdict::None => "none",
            FallVerdict::SpeedDown => "speed_down",
            FallVerdict::SpeedUp => "speed_up",
            FallVerdict::HighAcceleration => "high_acceleration",
            FallVerdict::SuddenDrop => "sudden_drop",
        }
    }
}

/// Current-cycle inputs to the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallInput {
    /// Current speed (m/s)
    pub speed: f32,
    /// Current acceleration (m/s²)
    pub acceleration: f32,
    /// Stable distance change over one loop interval (cm)
    pub distance_change: f32,
    /// Current stable distance (cm)
    ///
    /// Not read by the thresholds; the zone already encodes where the
    /// subject is. Carried so callers can log the full decision input.
    pub distance: f32,
    /// Zone of the current distance
    pub zone: Zone,
    /// Zone of the previous cycle
    pub previous_zone: Zone,
}

/// Threshold set for fall detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallClassifier {
    fall_speed: f32,
    upward_speed: f32,
    accel: f32,
    relaxed_accel: f32,
    sudden_drop_cm: f32,
}

impl FallClassifier {
    /// Classifier using the thresholds of `config`
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            fall_speed: config.fall_speed_threshold,
            upward_speed: config.upward_speed_threshold(),
            accel: config.accel_threshold,
            relaxed_accel: config.relaxed_accel_threshold(),
            sudden_drop_cm: config.sudden_drop_threshold_cm,
        }
    }

    /// Classify the current cycle
    pub fn detect(&self, input: &FallInput, history: &KinematicHistory) -> FallVerdict {
        if input.zone.suppresses_detection() {
            return FallVerdict::None;
        }

        if self.speed_down(input, history) {
            FallVerdict::SpeedDown
        } else if self.speed_up(history) {
            FallVerdict::SpeedUp
        } else if self.high_acceleration(input, history) {
            FallVerdict::HighAcceleration
        } else if self.sudden_drop(input) {
            FallVerdict::SuddenDrop
        } else {
            FallVerdict::None
        }
    }

    /// Current sample crosses a threshold without the evidence for a verdict
    ///
    /// Feeds the fall-warning counter. Only meaningful when `detect`
    /// returned `None` for the same input.
    pub fn is_warning(&self, input: &FallInput) -> bool {
        !input.zone.suppresses_detection()
            && (input.speed > self.fall_speed
                || input.speed < self.upward_speed
                || fabsf(input.acceleration) > self.accel)
    }

    fn speed_down(&self, input: &FallInput, history: &KinematicHistory) -> bool {
        sustained(history.speeds(), |s| s > self.fall_speed)
            && input.speed > self.fall_speed
            && input.distance_change > 0.0
    }

    fn speed_up(&self, history: &KinematicHistory) -> bool {
        sustained(history.speeds(), |s| s < self.upward_speed)
    }

    fn high_acceleration(&self, input: &FallInput, history: &KinematicHistory) -> bool {
        sustained(history.accelerations(), |a| fabsf(a) > self.accel)
            && fabsf(input.acceleration) > self.relaxed_accel
    }

    fn sudden_drop(&self, input: &FallInput) -> bool {
        input.previous_zone != Zone::Bottom && input.distance_change > self.sudden_drop_cm
    }
}

fn sustained(window: impl Iterator<Item = f32>, exceeds: impl Fn(f32) -> bool) -> bool {
    window.filter(|v| exceeds(*v)).count() >= SUSTAINED_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FallClassifier {
        FallClassifier::new(&MonitorConfig::default())
    }

    fn input(speed: f32, acceleration: f32, distance_change: f32) -> FallInput {
        FallInput {
            speed,
            acceleration,
            distance_change,
            distance: 100.0,
            zone: Zone::Mid,
            previous_zone: Zone::Mid,
        }
    }

    #[test]
    fn sustained_descent_is_speed_down() {
        let history = KinematicHistory::from_samples([0.8, 0.9, 0.85], [0.0; 3]);
        let verdict = classifier().detect(&input(0.9, 0.0, 4.5), &history);
        assert_eq!(verdict, FallVerdict::SpeedDown);
    }

    #[test]
    fn speed_down_needs_increasing_distance() {
        let history = KinematicHistory::from_samples([0.8, 0.9, 0.85], [0.0; 3]);
        let verdict = classifier().detect(&input(0.9, 0.0, 0.0), &history);
        assert_eq!(verdict, FallVerdict::None);
    }

    #[test]
    fn single_spike_is_ignored() {
        let history = KinematicHistory::from_samples([0.1, 0.0, 2.0], [0.0; 3]);
        let verdict = classifier().detect(&input(2.0, 0.0, 10.0), &history);
        assert_eq!(verdict, FallVerdict::None);
    }

    #[test]
    fn two_of_three_is_sustained() {
        let history = KinematicHistory::from_samples([0.9, 0.1, 0.9], [0.0; 3]);
        let verdict = classifier().detect(&input(0.9, 0.0, 4.5), &history);
        assert_eq!(verdict, FallVerdict::SpeedDown);
    }

    #[test]
    fn upward_threshold_is_stricter() {
        // -0.55 passes the downward magnitude but not 1.2x
        let history = KinematicHistory::from_samples([-0.55, -0.55, -0.55], [0.0; 3]);
        assert_eq!(classifier().detect(&input(-0.55, 0.0, -3.0), &history), FallVerdict::None);

        let history = KinematicHistory::from_samples([-0.7, -0.8, -0.75], [0.0; 3]);
        assert_eq!(classifier().detect(&input(-0.75, 0.0, -3.0), &history), FallVerdict::SpeedUp);
    }

    #[test]
    fn high_acceleration_needs_current_sample() {
        let history = KinematicHistory::from_samples([0.0; 3], [6.0, -7.0, 6.5]);
        assert_eq!(
            classifier().detect(&input(0.2, 4.5, 1.0), &history),
            FallVerdict::HighAcceleration
        );
        // Current below relaxed 4.0 m/s²
        assert_eq!(classifier().detect(&input(0.2, 3.0, 1.0), &history), FallVerdict::None);
    }

    #[test]
    fn speed_down_wins_over_acceleration() {
        let history = KinematicHistory::from_samples([0.8, 0.9, 0.85], [6.0, 7.0, 6.5]);
        let verdict = classifier().detect(&input(0.9, 6.5, 4.5), &history);
        assert_eq!(verdict, FallVerdict::SpeedDown);
    }

    #[test]
    fn sudden_drop_from_mid() {
        let history = KinematicHistory::new();
        let mut jump = input(0.0, 0.0, 35.0);
        jump.distance = 175.0;
        assert_eq!(classifier().detect(&jump, &history), FallVerdict::SuddenDrop);
    }

    #[test]
    fn sudden_drop_ignored_when_leaving_bottom() {
        let history = KinematicHistory::new();
        let mut jump = input(0.0, 0.0, 35.0);
        jump.previous_zone = Zone::Bottom;
        assert_eq!(classifier().detect(&jump, &history), FallVerdict::None);
    }

    #[test]
    fn landing_zones_suppress_everything() {
        let history = KinematicHistory::from_samples([0.8, 0.9, 0.85], [6.0, 7.0, 6.5]);
        for zone in [Zone::Top, Zone::Bottom] {
            let mut fall = input(0.9, 6.5, 40.0);
            fall.zone = zone;
            assert_eq!(classifier().detect(&fall, &history), FallVerdict::None);
            assert!(!classifier().is_warning(&fall));
        }
    }

    #[test]
    fn warnings_flag_unsustained_crossings() {
        let c = classifier();
        assert!(c.is_warning(&input(0.9, 0.0, 4.0)));
        assert!(c.is_warning(&input(-0.7, 0.0, -4.0)));
        assert!(c.is_warning(&input(0.0, -6.0, 0.0)));
        assert!(!c.is_warning(&input(0.3, 1.0, 1.0)));
    }

    #[test]
    fn labels() {
        assert_eq!(FallVerdict::SuddenDrop.label(), "sudden_drop");
        assert!(FallVerdict::SpeedUp.is_fall());
        assert!(!FallVerdict::None.is_fall());
    }
}
