//! Navigation system for the wall follower
//!
//! This module handles everything downstream of wall classification:
//! - Open-loop motion primitives (straight, pivot turns, stop)
//! - Lateral course correction against the left wall
//! - The fixed-rate decision loop

pub mod clock;
pub mod controller;
pub mod corrector;
pub mod planner;

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;

use crate::WallFollowerError;

pub use clock::{Clock, MonotonicClock, Rate, SimulatedClock};
pub use controller::{MotionController, Primitive};
pub use corrector::{Correction, CorrectionKind, CourseCorrector};
pub use planner::{Action, CycleReport, TickOutcome, WallFollower};

/// Velocity command for a differential-drive base
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityCommand {
    /// Forward velocity (m/s)
    pub linear_x: f64,
    /// Yaw rate (rad/s, counter-clockwise positive)
    pub angular_z: f64,
}

impl VelocityCommand {
    /// Creates a command from its components
    pub fn new(linear_x: f64, angular_z: f64) -> Self {
        VelocityCommand {
            linear_x,
            angular_z,
        }
    }

    /// The halt command
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether both components are zero
    pub fn is_zero(&self) -> bool {
        self.linear_x == 0.0 && self.angular_z == 0.0
    }
}

/// Sink for velocity commands
#[cfg_attr(test, mockall::automock)]
pub trait VelocityPublisher {
    /// Deliver one command to the base
    fn publish(&mut self, command: VelocityCommand) -> Result<(), WallFollowerError>;
}

/// Records every command; handy for dry runs and tests
impl VelocityPublisher for Vec<VelocityCommand> {
    fn publish(&mut self, command: VelocityCommand) -> Result<(), WallFollowerError> {
        self.push(command);
        Ok(())
    }
}

/// Motion primitive tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Forward speed while driving straight (m/s)
    pub linear_speed: f64,
    /// Yaw rate while pivoting (rad/s)
    pub angular_speed: f64,
    /// Angle of one pivot turn (rad)
    pub turn_angle: f64,
    /// Distance of the primary drive straight action (m)
    pub default_straight_distance: f64,
    /// Control loop and primitive publish rate (Hz)
    pub control_rate_hz: f64,
    /// Number of zero commands a stop publishes
    pub stop_hold_ticks: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            linear_speed: 0.2,
            angular_speed: PI / 36.0,
            turn_angle: PI / 2.0,
            default_straight_distance: 0.5,
            control_rate_hz: 100.0,
            stop_hold_ticks: 50,
        }
    }
}

impl MotionConfig {
    /// Length of one control tick, `None` when `control_rate_hz` does not give
    /// a representable non-zero period
    pub fn try_control_period(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / self.control_rate_hz)
            .ok()
            .filter(|period| !period.is_zero())
    }

    /// Length of one control tick.
    ///
    /// Falls back to the default 100 Hz period for a rate that
    /// `try_control_period` rejects.
    pub fn control_period(&self) -> Duration {
        self.try_control_period().unwrap_or(Duration::from_millis(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_period() {
        assert_eq!(MotionConfig::default().control_period(), Duration::from_millis(10));
    }

    #[rstest]
    #[case(1.0e-20)]
    #[case(1.0e12)]
    #[case(f64::NAN)]
    #[case(-5.0)]
    fn test_unusable_rate_has_no_period(#[case] rate: f64) {
        let config = MotionConfig {
            control_rate_hz: rate,
            ..MotionConfig::default()
        };
        assert_eq!(config.try_control_period(), None);
        assert_eq!(config.control_period(), Duration::from_millis(10));
    }

    #[test]
    fn test_vec_records_commands() {
        let mut sink: Vec<VelocityCommand> = Vec::new();
        sink.publish(VelocityCommand::new(0.2, 0.0)).unwrap();
        sink.publish(VelocityCommand::zero()).unwrap();

        assert_eq!(sink.len(), 2);
        assert!(!sink[0].is_zero());
        assert!(sink[1].is_zero());
    }
}
