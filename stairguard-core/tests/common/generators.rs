//! Motion profile generators
//!
//! Distances seen by a sensor at the top of the flight, one per
//! `LOOP_INTERVAL_MS` cycle.

use stairguard_core::constants::time::{CM_PER_METER, LOOP_INTERVAL_MS, MS_PER_SECOND};

/// Deterministic random number generator for tests
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        // Xorshift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16777216.0
    }

    pub fn gen_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Distance covered per cycle at `speed_m_s`
pub fn step_cm(speed_m_s: f32) -> f32 {
    speed_m_s * CM_PER_METER * LOOP_INTERVAL_MS as f32 / MS_PER_SECOND as f32
}

/// Subject standing still
pub fn stand(at_cm: f32, cycles: usize) -> Vec<f32> {
    vec![at_cm; cycles]
}

/// Constant-speed movement from `from_cm` to `to_cm`, inclusive of the end
pub fn travel(from_cm: f32, to_cm: f32, speed_m_s: f32) -> Vec<f32> {
    let step = step_cm(speed_m_s).copysign(to_cm - from_cm);
    let mut out = Vec::new();
    let mut d = from_cm;
    while (to_cm - d) * step.signum() > 0.0 {
        d += step;
        if (to_cm - d) * step.signum() < 0.0 {
            d = to_cm;
        }
        out.push(d);
    }
    out
}

/// Add uniform noise of `±amplitude_cm`
pub fn with_noise(profile: &[f32], amplitude_cm: f32, rng: &mut TestRng) -> Vec<f32> {
    profile
        .iter()
        .map(|d| d + rng.gen_range(-amplitude_cm, amplitude_cm))
        .collect()
}
