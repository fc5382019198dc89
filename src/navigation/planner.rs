// src/navigation/planner.rs
// The decision loop. Each control tick it classifies the latest scan, runs one
// primary primitive (straight, turn left or turn right), then lets the course
// corrector act on the same left-wall reading.

use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};

use super::clock::{Clock, Rate};
use super::controller::{MotionController, Primitive};
use super::corrector::{Correction, CourseCorrector};
use super::VelocityPublisher;
use crate::sensing::perception::PerceptionError;
use crate::sensing::{
    EdgeExtractor, EdgeReadings, Mode, Pose2D, SensorFeed, SensorMessage, SensorSnapshot,
    WallClassifier, WallFlags,
};
use crate::{WallFollowerConfig, WallFollowerError};

/// Primary action chosen from the wall flags
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Drive forward the given distance
    DriveStraight(f64),
    /// Pivot counter-clockwise
    TurnLeft,
    /// Pivot clockwise
    TurnRight,
}

impl Action {
    /// Picks the primary action: straight while the front is clear, otherwise
    /// toward an open left side, otherwise right.
    pub fn select(flags: WallFlags, straight_distance: f64) -> Self {
        if !flags.front {
            Action::DriveStraight(straight_distance)
        } else if !flags.left {
            Action::TurnLeft
        } else {
            Action::TurnRight
        }
    }
}

/// What one completed decision cycle did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Edge readings the cycle decided on
    pub edges: EdgeReadings,
    /// Wall flags derived from them
    pub flags: WallFlags,
    /// Primary action executed
    pub action: Action,
    /// Course correction executed, if any
    pub correction: Option<Correction>,
    /// Mode the loop settled in
    pub mode: Mode,
}

/// Result of one control tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No scan accepted yet; nothing published
    AwaitingScan,
    /// The latest scan was rejected; nothing published
    Skipped(PerceptionError),
    /// A full decision cycle ran
    Completed(CycleReport),
}

/// Reactive left-wall follower.
///
/// Owns the sensor snapshot and the motion controller. Inbound messages are
/// applied with [`WallFollower::handle_message`]; [`WallFollower::tick`] runs
/// one decision cycle and [`WallFollower::run`] repeats it at the control rate.
pub struct WallFollower<P, C> {
    extractor: EdgeExtractor,
    classifier: WallClassifier,
    corrector: CourseCorrector,
    controller: MotionController<P, C>,
    snapshot: SensorSnapshot,
    rejected_scan: Option<PerceptionError>,
    straight_distance: f64,
    mode: Mode,
}

impl<P: VelocityPublisher, C: Clock> WallFollower<P, C> {
    /// Builds a follower from a validated configuration
    pub fn new(
        config: &WallFollowerConfig,
        publisher: P,
        clock: C,
    ) -> Result<Self, WallFollowerError> {
        config.validate()?;
        let extractor = EdgeExtractor::new(&config.perception)?;

        Ok(WallFollower {
            extractor,
            classifier: WallClassifier::new(config.thresholds),
            corrector: CourseCorrector::new(config.thresholds),
            controller: MotionController::new(config.motion.clone(), publisher, clock),
            snapshot: SensorSnapshot::default(),
            rejected_scan: None,
            straight_distance: config.motion.default_straight_distance,
            mode: Mode::SelectingAction,
        })
    }

    /// Applies one inbound message to the snapshot
    pub fn handle_message(&mut self, message: SensorMessage) {
        match message {
            SensorMessage::Scan(ranges) => self.on_scan(&ranges),
            SensorMessage::Odometry(pose) => self.on_odometry(pose),
        }
    }

    /// Extracts edges from a scan. A rejected scan leaves the previous edges in
    /// place and makes the next tick skip.
    pub fn on_scan(&mut self, ranges: &[f32]) {
        match self.extractor.extract(ranges) {
            Ok(edges) => {
                self.snapshot = self.snapshot.with_edges(edges);
                self.rejected_scan = None;
            }
            Err(e) => {
                warn!("Rejected scan: {}", e);
                self.rejected_scan = Some(e);
            }
        }
    }

    /// Records the latest odometry pose
    pub fn on_odometry(&mut self, pose: Pose2D) {
        self.snapshot = self.snapshot.with_pose(pose);
    }

    /// Runs one decision cycle on the current snapshot.
    ///
    /// The primary action and any correction run to completion before this
    /// returns.
    pub fn tick(&mut self) -> TickOutcome {
        if let Some(e) = self.rejected_scan.take() {
            debug!("Skipping decision tick: {}", e);
            return TickOutcome::Skipped(e);
        }
        let Some(edges) = self.snapshot.edges else {
            return TickOutcome::AwaitingScan;
        };

        self.mode = Mode::SelectingAction;
        let flags = self.classifier.classify(&edges);
        let action = Action::select(flags, self.straight_distance);
        debug!("Selected {:?} (flags {:?})", action, flags);

        match action {
            Action::DriveStraight(distance) => {
                self.enter(Mode::ExecutingStraight);
                self.controller.drive_straight(distance);
            }
            Action::TurnLeft => {
                self.enter(Mode::ExecutingTurn);
                self.controller.turn_left();
            }
            Action::TurnRight => {
                self.enter(Mode::ExecutingTurn);
                self.controller.turn_right();
            }
        }

        let correction = self.corrector.plan(edges.left);
        if let Some(correction) = &correction {
            self.enter(Mode::Correcting);
            self.corrector.execute(correction, &mut self.controller);
        }

        let settled = match self.controller.last_primitive() {
            Some(Primitive::Stop) => Mode::Stopped,
            _ => Mode::SelectingAction,
        };
        self.enter(settled);

        TickOutcome::Completed(CycleReport {
            edges,
            flags,
            action,
            correction,
            mode: self.mode,
        })
    }

    /// Drains the feed and ticks at the control rate until `running` clears,
    /// then publishes a single zero command.
    pub fn run<F: SensorFeed>(&mut self, feed: &mut F, running: &AtomicBool) {
        info!("Wall follower running");
        let mut rate = Rate::new(
            self.controller.config().control_period(),
            self.controller.clock().now(),
        );
        let mut waiting_logged = false;

        while running.load(Ordering::SeqCst) {
            for message in feed.drain() {
                self.handle_message(message);
            }

            match self.tick() {
                TickOutcome::AwaitingScan if !waiting_logged => {
                    info!("Waiting for first scan");
                    waiting_logged = true;
                }
                TickOutcome::Completed(report) => {
                    debug!("Cycle complete: {:?}", report);
                }
                _ => {}
            }

            rate.sleep(self.controller.clock());
        }

        self.controller.halt();
        info!("Wall follower stopped");
    }

    /// Latest sensor snapshot
    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Motion controller, for inspecting the publisher and clock
    pub fn controller(&self) -> &MotionController<P, C> {
        &self.controller
    }

    fn enter(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("Mode: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{CorrectionKind, MockVelocityPublisher, SimulatedClock, VelocityCommand};
    use crate::sensing::perception::PerceptionConfig;
    use rstest::rstest;

    fn small_config() -> WallFollowerConfig {
        WallFollowerConfig {
            perception: PerceptionConfig {
                front_index: 2,
                left_index: 4,
            },
            ..WallFollowerConfig::default()
        }
    }

    fn scan(front: f32, middle: f32, left: f32) -> Vec<f32> {
        vec![9.0, 9.0, front, middle, left]
    }

    fn follower() -> WallFollower<Vec<VelocityCommand>, SimulatedClock> {
        WallFollower::new(&small_config(), Vec::new(), SimulatedClock::new()).unwrap()
    }

    #[rstest]
    #[case(false, false, Action::DriveStraight(0.5))]
    #[case(false, true, Action::DriveStraight(0.5))]
    #[case(true, false, Action::TurnLeft)]
    #[case(true, true, Action::TurnRight)]
    fn test_action_priority(#[case] front: bool, #[case] left: bool, #[case] expected: Action) {
        assert_eq!(Action::select(WallFlags { front, left }, 0.5), expected);
    }

    #[test]
    fn test_no_scan_publishes_nothing() {
        let publisher = MockVelocityPublisher::new();
        let mut follower =
            WallFollower::new(&small_config(), publisher, SimulatedClock::new()).unwrap();
        assert_eq!(follower.tick(), TickOutcome::AwaitingScan);
    }

    #[test]
    fn test_short_scan_skips_tick_without_publishing() {
        let publisher = MockVelocityPublisher::new();
        let mut follower =
            WallFollower::new(&small_config(), publisher, SimulatedClock::new()).unwrap();

        follower.on_scan(&[1.0, 1.0, 1.0]);
        assert_eq!(
            follower.tick(),
            TickOutcome::Skipped(PerceptionError::OutOfBounds {
                required: 5,
                len: 3
            })
        );
        // Nothing accepted yet, so the following tick still waits
        assert_eq!(follower.tick(), TickOutcome::AwaitingScan);
    }

    #[test]
    fn test_short_scan_keeps_previous_edges() {
        let mut follower = follower();
        follower.on_scan(&scan(2.0, 2.0, 0.6));
        follower.on_scan(&[0.1]);

        assert!(matches!(follower.tick(), TickOutcome::Skipped(_)));
        assert!(follower.controller().publisher().is_empty());
        assert_eq!(follower.snapshot().edges.unwrap().left, f64::from(0.6f32));
    }

    #[test]
    fn test_clear_front_at_band_edge_drives_only() {
        let mut follower = follower();
        // The sweep includes the left beam, so a clear front needs left >= 1.0
        follower.on_scan(&scan(2.0, 2.0, 1.0));

        let TickOutcome::Completed(report) = follower.tick() else {
            panic!("expected a completed cycle");
        };
        assert_eq!(report.action, Action::DriveStraight(0.5));
        assert_eq!(report.correction, None);
        assert_eq!(report.mode, Mode::Stopped);
        assert_eq!(follower.mode(), Mode::Stopped);
        assert!(follower.controller().publisher().iter().all(|c| c.angular_z == 0.0));
    }

    #[test]
    fn test_blocked_front_and_left_turns_right() {
        let mut follower = follower();
        follower.on_scan(&scan(0.5, 0.5, 0.7));

        let TickOutcome::Completed(report) = follower.tick() else {
            panic!("expected a completed cycle");
        };
        assert_eq!(report.flags, WallFlags { front: true, left: true });
        assert_eq!(report.action, Action::TurnRight);
        assert_eq!(report.mode, Mode::SelectingAction);
    }

    #[test]
    fn test_nan_left_turns_left_and_corrects() {
        let mut follower = follower();
        follower.on_scan(&scan(0.5, 0.8, f32::NAN));

        let TickOutcome::Completed(report) = follower.tick() else {
            panic!("expected a completed cycle");
        };
        assert_eq!(report.flags, WallFlags { front: true, left: false });
        assert_eq!(report.action, Action::TurnLeft);
        let correction = report.correction.unwrap();
        assert_eq!(correction.kind, CorrectionKind::TooFar);
        assert!(correction.distance.is_nan());
        assert_eq!(report.mode, Mode::Stopped);
    }

    #[test]
    fn test_odometry_does_not_change_decision() {
        let mut with_pose = follower();
        let mut without_pose = follower();
        for f in [&mut with_pose, &mut without_pose] {
            f.on_scan(&scan(0.5, 0.5, 0.7));
        }
        with_pose.on_odometry(Pose2D::new(4.0, -1.0, 1.2));

        let a = with_pose.tick();
        let b = without_pose.tick();
        assert_eq!(a, b);
        assert_eq!(
            with_pose.controller().publisher(),
            without_pose.controller().publisher()
        );
        assert_eq!(with_pose.snapshot().pose, Some(Pose2D::new(4.0, -1.0, 1.2)));
    }
}
