// src/navigation/controller.rs
// Executes the open-loop motion primitives by publishing velocity commands at
// the control rate. Distance and angle are integrated from elapsed time only;
// no sensor or pose feedback is read while a primitive runs.

use log::{info, trace, warn};
use std::time::Duration;

use super::clock::{Clock, Rate};
use super::{MotionConfig, VelocityCommand, VelocityPublisher};

/// Motion primitives the controller can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Drive forward a given distance
    DriveStraight,
    /// Pivot clockwise
    TurnRight,
    /// Pivot counter-clockwise
    TurnLeft,
    /// Hold a zero command
    Stop,
}

/// Runs motion primitives to completion.
///
/// Every primitive blocks until its own time, angle or tick budget is spent.
/// There is no way to abort one midway.
pub struct MotionController<P, C> {
    config: MotionConfig,
    publisher: P,
    clock: C,
    last_primitive: Option<Primitive>,
}

impl<P: VelocityPublisher, C: Clock> MotionController<P, C> {
    /// Creates a controller publishing through `publisher` and timed by `clock`
    pub fn new(config: MotionConfig, publisher: P, clock: C) -> Self {
        MotionController {
            config,
            publisher,
            clock,
            last_primitive: None,
        }
    }

    /// Drives forward until `linear_speed × elapsed` reaches `target_distance`,
    /// then stops.
    ///
    /// The first command goes out before the distance is checked, so a zero,
    /// negative or non-finite target still publishes one drive command. A
    /// non-finite target never extends the drive past that command.
    pub fn drive_straight(&mut self, target_distance: f64) {
        info!("Driving straight for {:.3} m", target_distance);
        self.last_primitive = Some(Primitive::DriveStraight);

        let speed = self.config.linear_speed;
        let command = VelocityCommand::new(speed, 0.0);
        let start = self.clock.now();
        let mut rate = Rate::new(self.period(), start);

        let mut driving = true;
        while driving {
            self.send(command);
            let travelled = speed * self.clock.now().saturating_sub(start).as_secs_f64();
            rate.sleep(&self.clock);
            driving = target_distance.is_finite() && travelled < target_distance;
        }

        self.stop();
    }

    /// Pivots clockwise by the configured turn angle
    pub fn turn_right(&mut self) {
        info!("Turning right");
        self.last_primitive = Some(Primitive::TurnRight);
        self.turn(-self.config.angular_speed);
    }

    /// Pivots counter-clockwise by the configured turn angle
    pub fn turn_left(&mut self) {
        info!("Turning left");
        self.last_primitive = Some(Primitive::TurnLeft);
        self.turn(self.config.angular_speed);
    }

    // Publishes the yaw rate until the remaining angle is used up, then one
    // zero command. Does not hold a stop.
    fn turn(&mut self, angular_z: f64) {
        let angular_speed = angular_z.abs();
        let mut command = VelocityCommand::new(0.0, angular_z);
        let start = self.clock.now();
        let mut rate = Rate::new(self.period(), start);

        let mut turning = true;
        while turning {
            self.send(command);
            let elapsed = self.clock.now().saturating_sub(start).as_secs_f64();
            let remaining = self.config.turn_angle - elapsed * angular_speed;
            rate.sleep(&self.clock);
            turning = remaining > 0.0;
        }

        command.angular_z = 0.0;
        self.send(command);
    }

    /// Publishes a zero command `stop_hold_ticks` times, one per tick
    pub fn stop(&mut self) {
        self.last_primitive = Some(Primitive::Stop);
        let mut rate = Rate::new(self.period(), self.clock.now());

        for _ in 0..self.config.stop_hold_ticks {
            trace!("Robot Stop");
            self.send(VelocityCommand::zero());
            rate.sleep(&self.clock);
        }
    }

    /// Publishes a single zero command, used on shutdown
    pub fn halt(&mut self) {
        info!("Halting");
        self.send(VelocityCommand::zero());
    }

    /// The primitive run most recently, if any
    pub fn last_primitive(&self) -> Option<Primitive> {
        self.last_primitive
    }

    /// Motion tuning in use
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Time source in use
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Command sink in use
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    fn period(&self) -> Duration {
        self.config.control_period()
    }

    fn send(&mut self, command: VelocityCommand) {
        if let Err(e) = self.publisher.publish(command) {
            warn!("Failed to publish velocity command: {}", e);
        }
    }
}
