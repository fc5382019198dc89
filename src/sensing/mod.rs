//! Sensing for the wall follower
//!
//! This module turns raw range scans and odometry into the values the
//! decision loop reads:
//! - Edge distances extracted from a scan
//! - Wall presence flags
//! - The robot pose

pub mod localization;
pub mod perception;
pub mod state;

pub use localization::Pose2D;
pub use perception::{EdgeExtractor, EdgeReadings};
pub use state::{Mode, WallClassifier, WallFlags, WallThresholds};

/// Latest accepted sensor values, owned by the decision loop.
///
/// Each field is replaced as a whole when a message is accepted, so a reader
/// never sees edges from two different scans.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Edge readings of the last accepted scan, `None` until one arrives
    pub edges: Option<EdgeReadings>,
    /// Last odometry pose
    pub pose: Option<Pose2D>,
}

impl SensorSnapshot {
    /// Snapshot with the edges replaced
    pub fn with_edges(self, edges: EdgeReadings) -> Self {
        SensorSnapshot {
            edges: Some(edges),
            ..self
        }
    }

    /// Snapshot with the pose replaced
    pub fn with_pose(self, pose: Pose2D) -> Self {
        SensorSnapshot {
            pose: Some(pose),
            ..self
        }
    }
}

/// Message delivered by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum SensorMessage {
    /// Range scan, angularly ordered right to left
    Scan(Vec<f32>),
    /// Odometry pose
    Odometry(Pose2D),
}

/// Source of inbound sensor messages.
///
/// `drain` must not block: it returns whatever arrived since the last call,
/// oldest first, possibly nothing.
pub trait SensorFeed {
    /// Take every pending message
    fn drain(&mut self) -> Vec<SensorMessage>;
}
