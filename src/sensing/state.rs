// sensing/state.rs

// Wall presence classification and the decision loop's operating modes.
// Flags are recomputed from the latest edge readings every tick and never
// carried over.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::perception::EdgeReadings;

/// Wall detection and following distances, in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallThresholds {
    /// A closest edge below this means a wall ahead
    pub front_safety_distance: f64,
    /// Target clearance when moving away from a wall that is too close
    pub following_distance_min: f64,
    /// Target clearance when moving toward a wall that is too far
    pub following_distance_max: f64,
    /// Left range below this triggers a correction away from the wall
    pub laser_distance_min: f64,
    /// Left range above this triggers a correction toward the wall; also the
    /// left wall detection limit
    pub laser_distance_max: f64,
}

impl Default for WallThresholds {
    fn default() -> Self {
        WallThresholds {
            front_safety_distance: 1.0,
            following_distance_min: 0.2,
            following_distance_max: 0.4,
            laser_distance_min: 0.4,
            laser_distance_max: 1.0,
        }
    }
}

/// Wall presence around the robot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallFlags {
    /// Wall ahead within the safety distance
    pub front: bool,
    /// Wall on the left within laser range
    pub left: bool,
}

/// Thresholds edge readings into wall flags
#[derive(Debug, Clone)]
pub struct WallClassifier {
    thresholds: WallThresholds,
}

impl WallClassifier {
    /// Creates a classifier with the given thresholds
    pub fn new(thresholds: WallThresholds) -> Self {
        WallClassifier { thresholds }
    }

    /// Classifies edge readings. Comparisons are strict, so NaN ranges read
    /// as "no wall".
    pub fn classify(&self, edges: &EdgeReadings) -> WallFlags {
        debug!("front edge {:.3}, left edge {:.3}", edges.front, edges.left);

        let flags = WallFlags {
            front: edges.closest < self.thresholds.front_safety_distance,
            left: edges.left < self.thresholds.laser_distance_max,
        };

        debug!("wall flags: front={} left={}", flags.front, flags.left);
        flags
    }
}

/// Decision loop operating modes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Between primitives, ready to decide
    #[default]
    SelectingAction,
    /// Primary drive straight in progress
    ExecutingStraight,
    /// Primary pivot turn in progress
    ExecutingTurn,
    /// Course correction maneuver in progress
    Correcting,
    /// Last primitive was a stop hold
    Stopped,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Mode::SelectingAction => "selecting action",
            Mode::ExecutingStraight => "executing straight",
            Mode::ExecutingTurn => "executing turn",
            Mode::Correcting => "correcting",
            Mode::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn edges(closest: f64, left: f64) -> EdgeReadings {
        EdgeReadings {
            front: closest,
            left,
            closest,
        }
    }

    #[rstest]
    #[case(0.5, true)]
    #[case(0.999, true)]
    #[case(1.0, false)]
    #[case(2.0, false)]
    #[case(f64::INFINITY, false)]
    #[case(f64::NAN, false)]
    fn test_front_wall(#[case] closest: f64, #[case] expected: bool) {
        let classifier = WallClassifier::new(WallThresholds::default());
        assert_eq!(classifier.classify(&edges(closest, 0.5)).front, expected);
    }

    #[rstest]
    #[case(0.05, true)]
    #[case(0.7, true)]
    #[case(1.0, false)]
    #[case(1.5, false)]
    #[case(f64::NAN, false)]
    fn test_left_wall(#[case] left: f64, #[case] expected: bool) {
        let classifier = WallClassifier::new(WallThresholds::default());
        assert_eq!(classifier.classify(&edges(2.0, left)).left, expected);
    }

    #[test]
    fn test_front_uses_closest_not_front_beam() {
        let classifier = WallClassifier::new(WallThresholds::default());
        let readings = EdgeReadings {
            front: 3.0,
            left: 2.0,
            closest: 0.6,
        };
        assert!(classifier.classify(&readings).front);
    }
}
