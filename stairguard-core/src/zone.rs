//! Zone Classifier
//!
//! Places the subject on the staircase relative to the calibrated length:
//!
//! ```text
//! sensor ─┬─ 0 cm
//!         │  Top      distance < top_width
//!         ├─
//!         │  Mid      open stair, fall detection active
//!         ├─
//!         │  Bottom   |distance - stair_length| < bottom_width
//!         ┴─ stair_length
//! ```
//!
//! Top and Bottom are the landings, where fast approach or departure is
//! normal. An unreliable distance is classified Mid.

use libm::fabsf;

use crate::stabilizer::StableDistance;

/// Region of the staircase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Zone {
    /// Top landing, near the sensor
    Top,
    /// Bottom landing, around the calibrated length
    Bottom,
    /// Open stair
    #[default]
    Mid,
}

impl Zone {
    /// Short label for status output
    pub const fn label(&self) -> &'static str {
        match self {
            Zone::Top => "top",
            Zone::Bottom => "bottom",
            Zone::Mid => "mid",
        }
    }

    /// Landing zones suppress fall detection
    pub const fn suppresses_detection(&self) -> bool {
        matches!(self, Zone::Top | Zone::Bottom)
    }
}

/// Classifier bound to one calibrated stair length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneClassifier {
    stair_length_cm: f32,
    top_width_cm: f32,
    bottom_width_cm: f32,
}

impl ZoneClassifier {
    /// Classifier for a calibrated length and zone widths
    pub const fn new(stair_length_cm: f32, top_width_cm: f32, bottom_width_cm: f32) -> Self {
        Self {
            stair_length_cm,
            top_width_cm,
            bottom_width_cm,
        }
    }

    /// Calibrated stair length (cm)
    pub const fn stair_length(&self) -> f32 {
        self.stair_length_cm
    }

    /// Zone of a stable distance
    pub fn classify(&self, distance: StableDistance) -> Zone {
        if !distance.reliable || !distance.value.is_finite() {
            return Zone::Mid;
        }

        if distance.value < self.top_width_cm {
            Zone::Top
        } else if fabsf(distance.value - self.stair_length_cm) < self.bottom_width_cm {
            Zone::Bottom
        } else {
            Zone::Mid
        }
    }
}
