//! Kinematics Estimator
//!
//! Derives signed speed and acceleration from successive stable distances.
//!
//! Sign convention: positive speed is moving away from the sensor
//! (descending the stairs), negative is approaching (ascending).
//!
//! ```text
//! speed        = (curr_cm - prev_cm) / CM_PER_METER / dt        m/s
//! acceleration = (speed - history.speed.last()) / dt            m/s²
//! ```
//!
//! Acceleration is differenced against the newest slot of the speed ring
//! *before* this cycle's speed is written, so it stays continuous across the
//! wraparound and across cycles where no speed was derived. After a reset
//! that slot is zero.

use crate::{
    buffer::CircularBuffer,
    constants::{buffers::CONSECUTIVE_READINGS, time::CM_PER_METER},
};

/// Recent speeds and accelerations for sustained-evidence checks
#[derive(Debug, Clone)]
pub struct KinematicHistory {
    speeds: CircularBuffer<f32, CONSECUTIVE_READINGS>,
    accelerations: CircularBuffer<f32, CONSECUTIVE_READINGS>,
}

impl Default for KinematicHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicHistory {
    /// Zeroed history
    pub const fn new() -> Self {
        Self {
            speeds: CircularBuffer::filled(0.0),
            accelerations: CircularBuffer::filled(0.0),
        }
    }

    /// Build from explicit windows, oldest first
    pub fn from_samples(
        speeds: [f32; CONSECUTIVE_READINGS],
        accelerations: [f32; CONSECUTIVE_READINGS],
    ) -> Self {
        let mut history = Self::new();
        for (s, a) in speeds.iter().zip(accelerations.iter()) {
            history.record(*s, *a);
        }
        history
    }

    /// Write one pair, evicting the oldest
    pub fn record(&mut self, speed: f32, acceleration: f32) {
        self.speeds.push(speed);
        self.accelerations.push(acceleration);
    }

    /// Newest speed, zero after a reset
    pub fn last_speed(&self) -> f32 {
        self.speeds.last().copied().unwrap_or(0.0)
    }

    /// Speed window, oldest first
    pub fn speeds(&self) -> impl Iterator<Item = f32> + '_ {
        self.speeds.iter().copied()
    }

    /// Acceleration window, oldest first
    pub fn accelerations(&self) -> impl Iterator<Item = f32> + '_ {
        self.accelerations.iter().copied()
    }

    /// Zero both windows
    pub fn reset(&mut self) {
        self.speeds.fill(0.0);
        self.accelerations.fill(0.0);
    }
}

/// Finite-difference estimator with a near-zero `dt` guard
#[derive(Debug, Clone, Copy)]
pub struct KinematicsEstimator {
    dt_epsilon_s: f32,
}

impl KinematicsEstimator {
    /// Estimator that refuses intervals shorter than `dt_epsilon_s`
    pub const fn new(dt_epsilon_s: f32) -> Self {
        Self { dt_epsilon_s }
    }

    /// Derive `(speed, acceleration)` and record them in `history`
    ///
    /// Intervals below the epsilon yield `(0.0, 0.0)`; that pair is still
    /// recorded so the window keeps advancing once per cycle.
    pub fn derive(
        &self,
        prev_cm: f32,
        curr_cm: f32,
        dt_s: f32,
        history: &mut KinematicHistory,
    ) -> (f32, f32) {
        let (speed, acceleration) = if dt_s < self.dt_epsilon_s {
            log_debug!("dt {}s below epsilon, zero kinematics", dt_s);
            (0.0, 0.0)
        } else {
            let speed = (curr_cm - prev_cm) / CM_PER_METER / dt_s;
            let acceleration = (speed - history.last_speed()) / dt_s;
            (speed, acceleration)
        };

        history.record(speed, acceleration);
        (speed, acceleration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::time::DT_EPSILON_S;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn descending_is_positive() {
        let estimator = KinematicsEstimator::new(DT_EPSILON_S);
        let mut history = KinematicHistory::new();

        // 5 cm in 50 ms = 1 m/s away from the sensor
        let (speed, accel) = estimator.derive(100.0, 105.0, 0.05, &mut history);
        assert!(close(speed, 1.0));
        // From rest: 1 m/s in 50 ms
        assert!(close(accel, 20.0));
    }

    #[test]
    fn ascending_is_negative() {
        let estimator = KinematicsEstimator::new(DT_EPSILON_S);
        let mut history = KinematicHistory::new();

        let (speed, _) = estimator.derive(105.0, 100.0, 0.05, &mut history);
        assert!(close(speed, -1.0));
    }

    #[test]
    fn acceleration_uses_previous_speed() {
        let estimator = KinematicsEstimator::new(DT_EPSILON_S);
        let mut history = KinematicHistory::new();

        estimator.derive(100.0, 105.0, 0.05, &mut history); // 1.0 m/s
        let (speed, accel) = estimator.derive(105.0, 111.0, 0.05, &mut history); // 1.2 m/s
        assert!(close(speed, 1.2));
        assert!(close(accel, 4.0));
    }

    #[test]
    fn acceleration_continuous_across_wraparound() {
        let estimator = KinematicsEstimator::new(DT_EPSILON_S);
        let mut history = KinematicHistory::new();

        let mut d = 100.0;
        for _ in 0..CONSECUTIVE_READINGS {
            estimator.derive(d, d + 5.0, 0.05, &mut history);
            d += 5.0;
        }
        // Constant speed after the ring wrapped: no acceleration
        let (_, accel) = estimator.derive(d, d + 5.0, 0.05, &mut history);
        assert!(close(accel, 0.0));
    }

    #[test]
    fn tiny_dt_yields_zero() {
        let estimator = KinematicsEstimator::new(DT_EPSILON_S);
        let mut history = KinematicHistory::new();

        assert_eq!(estimator.derive(100.0, 150.0, 0.0, &mut history), (0.0, 0.0));
        assert_eq!(estimator.derive(100.0, 150.0, 1e-5, &mut history), (0.0, 0.0));
        assert!(history.speeds().all(|s| s == 0.0));
    }

    #[test]
    fn history_records_and_resets() {
        let estimator = KinematicsEstimator::new(DT_EPSILON_S);
        let mut history = KinematicHistory::new();
        estimator.derive(100.0, 105.0, 0.05, &mut history);
        assert!(close(history.last_speed(), 1.0));
        assert_eq!(history.speeds().count(), CONSECUTIVE_READINGS);

        history.reset();
        assert!(history.speeds().all(|s| s == 0.0));
        assert!(history.accelerations().all(|a| a == 0.0));
        assert_eq!(history.last_speed(), 0.0);
    }

    #[test]
    fn from_samples_keeps_order() {
        let history = KinematicHistory::from_samples([0.8, 0.9, 0.85], [0.0, 1.0, 2.0]);
        let speeds: Vec<f32> = history.speeds().collect();
        assert_eq!(speeds, vec![0.8, 0.9, 0.85]);
        assert_eq!(history.last_speed(), 0.85);
    }
}
