// src/navigation/corrector.rs
// Regulates lateral clearance from the left wall. When the left range leaves
// the dead-band the robot turns square to the wall, covers the projected
// clearance error, turns back and stops.

use log::{debug, info};

use super::clock::Clock;
use super::controller::MotionController;
use super::VelocityPublisher;
use crate::sensing::WallThresholds;

// sin(30°)
const SIN_30_DEG: f64 = 0.5;

/// Which side of the dead-band the robot is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionKind {
    /// Left wall below `laser_distance_min`; move away from it
    TooClose,
    /// Left wall beyond `laser_distance_max` or not seen; move toward it
    TooFar,
}

/// A planned correction maneuver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Direction of the correction
    pub kind: CorrectionKind,
    /// Straight segment length (m); NaN when the left range was NaN or
    /// infinite, which skips the straight segment
    pub distance: f64,
}

/// Plans and executes course corrections
#[derive(Debug, Clone)]
pub struct CourseCorrector {
    thresholds: WallThresholds,
}

impl CourseCorrector {
    /// Creates a corrector with the given thresholds
    pub fn new(thresholds: WallThresholds) -> Self {
        CourseCorrector { thresholds }
    }

    /// Decides whether `left` needs correcting.
    ///
    /// A NaN or infinite range counts as too far, unlike wall classification
    /// where NaN counts as no wall. Without a usable range there is nothing
    /// to project, so its correction distance is NaN and only the turns run.
    pub fn plan(&self, left: f64) -> Option<Correction> {
        let t = &self.thresholds;
        if left < t.laser_distance_min {
            Some(Correction {
                kind: CorrectionKind::TooClose,
                distance: t.following_distance_min - left * SIN_30_DEG,
            })
        } else if !left.is_finite() {
            Some(Correction {
                kind: CorrectionKind::TooFar,
                distance: f64::NAN,
            })
        } else if left > t.laser_distance_max {
            Some(Correction {
                kind: CorrectionKind::TooFar,
                distance: left * SIN_30_DEG - t.following_distance_max,
            })
        } else {
            debug!("Left clearance {:.3} within dead-band", left);
            None
        }
    }

    /// Runs the turn, straight, turn, stop sequence for `correction`
    pub fn execute<P: VelocityPublisher, C: Clock>(
        &self,
        correction: &Correction,
        controller: &mut MotionController<P, C>,
    ) {
        info!(
            "Correcting course: {:?}, straight segment {:.3} m",
            correction.kind, correction.distance
        );

        match correction.kind {
            CorrectionKind::TooClose => {
                controller.turn_right();
                controller.drive_straight(correction.distance);
                controller.turn_left();
            }
            CorrectionKind::TooFar => {
                controller.turn_left();
                controller.drive_straight(correction.distance);
                controller.turn_right();
            }
        }
        controller.stop();
    }

    /// Plans a correction for `left` and runs it if one is needed
    pub fn correct<P: VelocityPublisher, C: Clock>(
        &self,
        left: f64,
        controller: &mut MotionController<P, C>,
    ) -> Option<Correction> {
        let correction = self.plan(left)?;
        self.execute(&correction, controller);
        Some(correction)
    }
}
