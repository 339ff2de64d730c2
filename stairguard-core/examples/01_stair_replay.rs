//! Stair Replay Example
//!
//! Replays a synthetic session through the full driver: calibration on an
//! empty staircase, a normal descent, a forward fall, and the operator
//! pressing resume.
//!
//! ## What You'll Learn
//!
//! - Implementing the sensor, actuator and alert traits
//! - Driving `StairGuard` cycle by cycle with a manual clock
//! - Reading the per-cycle status record
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_stair_replay
//! ```

use std::collections::VecDeque;

use stairguard_core::{
    constants::time::LOOP_INTERVAL_MS,
    errors::SensorFault,
    events::{AlertPattern, CycleStatus, DeployReason, KinematicSnapshot},
    time::ManualClock,
    traits::{Actuator, AlertDriver, RangeSensor, StatusSink},
    Monitor, MonitorConfig, StairGuard, StopResumeEvent, SystemState,
};

/// Plays back recorded distances, then times out
struct Recording(VecDeque<f32>);

impl RangeSensor for Recording {
    type Error = SensorFault;

    fn measure(&mut self) -> nb::Result<f32, SensorFault> {
        self.0.pop_front().ok_or(nb::Error::Other(SensorFault::NoEcho))
    }
}

struct PrintActuator;

impl Actuator for PrintActuator {
    fn deploy(&mut self, reason: DeployReason, snapshot: KinematicSnapshot) {
        println!(
            "  >> DEPLOY ({:?}) at {:.1} cm, {:.2} m/s, {:.1} m/s²",
            reason, snapshot.distance, snapshot.speed, snapshot.acceleration
        );
    }

    fn retract(&mut self) {
        println!("  >> RETRACT");
    }
}

struct PrintAlerts;

impl AlertDriver for PrintAlerts {
    fn alert_on(&mut self, pattern: AlertPattern) {
        println!("  >> ALERT ON  {:?}", pattern);
    }

    fn alert_off(&mut self) {
        println!("  >> ALERT OFF");
    }
}

/// Prints a status line on state changes and every tenth cycle
#[derive(Default)]
struct Console {
    cycles: u32,
    last_state: Option<SystemState>,
}

impl StatusSink for Console {
    fn record(&mut self, status: &CycleStatus) {
        self.cycles += 1;
        if self.last_state != Some(status.state) || self.cycles % 10 == 0 {
            println!(
                "t={:5}ms  {:16} d={:>6}  v={:+.2} m/s  a={:+6.1} m/s²  zone={:6} warnings={}",
                status.timestamp,
                status.state.label(),
                status
                    .distance
                    .map(|d| format!("{:.1}", d))
                    .unwrap_or_else(|| "-".into()),
                status.speed,
                status.acceleration,
                status.zone.label(),
                status.warnings,
            );
        }
        self.last_state = Some(status.state);
    }
}

/// Distances seen from the top of a 150 cm flight
fn session() -> VecDeque<f32> {
    let mut d = Vec::new();

    // Empty stairs during calibration, with sensor jitter
    d.extend((0..60).map(|i| 150.0 + ((i % 3) as f32 - 1.0) * 0.4));
    // Subject steps onto the top landing
    d.extend([12.0; 10]);
    // Calm descent at 0.3 m/s to mid-flight
    let mut x = 12.0;
    while x < 80.0 {
        x += 1.5;
        d.push(x);
    }
    d.extend([80.0; 10]);
    // Trips and falls forward at 1.2 m/s
    while x < 140.0 {
        x += 6.0;
        d.push(x);
    }
    // Lying near the bottom, then the operator takes over
    d.extend([141.0; 40]);
    d.into()
}

fn main() {
    println!("StairGuard Replay Example");
    println!("=========================\n");

    let monitor = match Monitor::new(MonitorConfig::default()) {
        Ok(monitor) => monitor,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return;
        }
    };

    let mut guard = StairGuard::new(
        monitor,
        Recording(session()),
        PrintActuator,
        PrintAlerts,
        Console::default(),
        ManualClock::new(0),
    );

    let mut resumed = false;
    for cycle in 0..300 {
        // Operator presses resume a second after the fall response
        let event = match guard.state() {
            SystemState::FallResponse(_) if !resumed && cycle % 20 == 0 => {
                resumed = true;
                println!("\n-- operator presses stop/resume --");
                Some(StopResumeEvent)
            }
            _ => None,
        };

        guard.run_cycle(event);
        guard.clock_mut().advance(LOOP_INTERVAL_MS);

        if guard.is_halted() {
            break;
        }
    }

    println!("\nFinal state: {}", guard.state().label());
    if let Some(length) = guard.monitor().stair_length() {
        println!("Calibrated stair length: {:.1} cm", length);
    }
}
