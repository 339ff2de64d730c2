//! Distance Stabilizer
//!
//! Turns one raw range reading per cycle into a stable distance estimate.
//!
//! ## Algorithm
//!
//! 1. Push the raw [`RangeSample`] into a `DEBOUNCE_DEPTH` ring buffer.
//! 2. Collect the buffered samples marked valid.
//! 3. Non-empty: return their median. For an even count the lower-middle
//!    element is taken; at this depth the choice is a fixed tie-break, not a
//!    statistical one.
//! 4. Empty: return the newest raw value flagged unreliable.
//!
//! ```text
//! raw:    [118, ✗, 121, 500✗, 120]
//! valid:  [118, 120, 121]
//! median: 120
//! ```
//!
//! Nothing here fails. A timeout or out-of-band reading is just an invalid
//! sample, and the fallback path keeps the output defined.

use heapless::Vec;

use crate::{
    buffer::CircularBuffer,
    constants::buffers::DEBOUNCE_DEPTH,
    traits::RangeSensor,
};

/// A single raw reading and whether it can be trusted
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeSample {
    /// Reported distance (cm); meaningless when `valid` is false
    pub distance: f32,
    /// Inside the validity band and not a timeout
    pub valid: bool,
}

impl RangeSample {
    /// Classify a reading against the validity band
    pub fn new(distance: f32, min_cm: f32, max_cm: f32) -> Self {
        let valid = distance.is_finite() && distance >= min_cm && distance <= max_cm;
        Self { distance, valid }
    }

    /// Sample produced by a sensor timeout
    pub const fn timeout() -> Self {
        Self { distance: 0.0, valid: false }
    }

    /// Take one reading from `sensor`
    ///
    /// `WouldBlock` and driver errors both degrade to [`RangeSample::timeout`].
    pub fn acquire<S: RangeSensor>(sensor: &mut S, min_cm: f32, max_cm: f32) -> Self {
        match sensor.measure() {
            Ok(distance) => Self::new(distance, min_cm, max_cm),
            Err(nb::Error::WouldBlock) => {
                log_debug!("range sensor not ready, treating as timeout");
                Self::timeout()
            }
            Err(nb::Error::Other(_e)) => {
                log_debug!("range sensor fault: {:?}", _e);
                Self::timeout()
            }
        }
    }
}

/// Denoised distance for one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StableDistance {
    /// Estimated distance (cm)
    pub value: f32,
    /// False when no buffered sample was valid and `value` is the raw fallback
    pub reliable: bool,
}

/// Median filter over the last `DEBOUNCE_DEPTH` raw samples
#[derive(Debug, Clone, Default)]
pub struct DistanceStabilizer {
    history: CircularBuffer<RangeSample, DEBOUNCE_DEPTH>,
}

impl DistanceStabilizer {
    /// Empty stabilizer
    pub const fn new() -> Self {
        Self { history: CircularBuffer::new() }
    }

    /// Push one raw sample and return the stable distance
    pub fn stabilize(&mut self, sample: RangeSample) -> StableDistance {
        self.history.push(sample);

        let mut valid: Vec<f32, DEBOUNCE_DEPTH> = Vec::new();
        for s in self.history.iter().filter(|s| s.valid) {
            // Capacity equals history depth
            let _ = valid.push(s.distance);
        }

        if valid.is_empty() {
            return StableDistance { value: sample.distance, reliable: false };
        }

        valid.sort_unstable_by(|a, b| a.total_cmp(b));
        StableDistance {
            value: valid[(valid.len() - 1) / 2],
            reliable: true,
        }
    }

    /// Most recent raw sample
    pub fn latest(&self) -> Option<&RangeSample> {
        self.history.last()
    }

    /// Buffered raw samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &RangeSample> {
        self.history.iter()
    }

    /// Forget all buffered samples
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
