//! Wall Follower - reactive left-wall following for differential-drive robots
//!
//! This library reads a 2D range scanner and odometry, decides whether there is
//! a wall ahead or on the left, and drives the robot with open-loop motion
//! primitives so it keeps moving forward at a steady clearance from the left
//! wall. The ROS 2 transport lives behind the `ros` feature; everything else
//! is plain Rust and runs against any [`VelocityPublisher`] and [`Clock`].

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod navigation;
#[cfg(feature = "ros")]
pub mod ros_interface;
pub mod sensing;

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

// Re-export commonly used items for easier access
pub use navigation::{
    Action, Clock, CourseCorrector, MonotonicClock, MotionConfig, MotionController, Rate,
    SimulatedClock, VelocityCommand, VelocityPublisher, WallFollower,
};
pub use sensing::{
    EdgeExtractor, EdgeReadings, Pose2D, SensorFeed, SensorMessage, SensorSnapshot,
    WallClassifier, WallFlags, WallThresholds,
};
pub use sensing::perception::{PerceptionConfig, PerceptionError};

/// Main configuration structure for the wall follower
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallFollowerConfig {
    /// Scan indices used for edge extraction
    pub perception: PerceptionConfig,
    /// Wall detection and following distances
    pub thresholds: WallThresholds,
    /// Motion primitive tuning and control rate
    pub motion: MotionConfig,
    /// ROS 2 node and topic settings
    pub ros: RosConfig,
}

/// ROS 2 specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosConfig {
    /// Node name
    pub node_name: String,
    /// Node namespace
    pub namespace: String,
    /// Range scan topic
    pub scan_topic: String,
    /// Odometry topic
    pub odom_topic: String,
    /// Velocity command topic
    pub cmd_vel_topic: String,
    /// Subscription queue depth
    pub qos_depth: usize,
    /// Velocity publisher queue depth
    pub cmd_vel_qos_depth: usize,
}

impl Default for RosConfig {
    fn default() -> Self {
        RosConfig {
            node_name: "wall_follower".to_string(),
            namespace: String::new(),
            scan_topic: "/scan".to_string(),
            odom_topic: "/odom".to_string(),
            cmd_vel_topic: "/mobile_base/commands/velocity".to_string(),
            qos_depth: 10,
            cmd_vel_qos_depth: 100,
        }
    }
}

impl WallFollowerConfig {
    /// Load and validate a configuration from a YAML file.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WallFollowerError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(WallFollowerError::IoError)?;
        let config: WallFollowerConfig = serde_yaml::from_reader(file).map_err(|e| {
            WallFollowerError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, WallFollowerError> {
        let config: WallFollowerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| WallFollowerError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tunable is usable by the controller
    pub fn validate(&self) -> Result<(), WallFollowerError> {
        let perception = &self.perception;
        if perception.front_index > perception.left_index {
            return Err(WallFollowerError::ConfigError(format!(
                "front_index ({}) must not exceed left_index ({})",
                perception.front_index, perception.left_index
            )));
        }

        let t = &self.thresholds;
        let distances = [
            ("front_safety_distance", t.front_safety_distance),
            ("following_distance_min", t.following_distance_min),
            ("following_distance_max", t.following_distance_max),
            ("laser_distance_min", t.laser_distance_min),
            ("laser_distance_max", t.laser_distance_max),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(WallFollowerError::ConfigError(format!(
                    "{} must be a finite non-negative distance, got {}",
                    name, value
                )));
            }
        }
        if t.following_distance_min > t.following_distance_max {
            return Err(WallFollowerError::ConfigError(
                "following_distance_min must not exceed following_distance_max".to_string(),
            ));
        }
        if t.laser_distance_min > t.laser_distance_max {
            return Err(WallFollowerError::ConfigError(
                "laser_distance_min must not exceed laser_distance_max".to_string(),
            ));
        }

        let m = &self.motion;
        let positive = [
            ("linear_speed", m.linear_speed),
            ("angular_speed", m.angular_speed),
            ("turn_angle", m.turn_angle),
            ("control_rate_hz", m.control_rate_hz),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(WallFollowerError::ConfigError(format!(
                    "{} must be a finite positive value, got {}",
                    name, value
                )));
            }
        }
        if m.try_control_period().is_none() {
            return Err(WallFollowerError::ConfigError(format!(
                "control_rate_hz {} does not give a usable control period",
                m.control_rate_hz
            )));
        }
        if !m.default_straight_distance.is_finite() {
            return Err(WallFollowerError::ConfigError(
                "default_straight_distance must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

/// Wall follower error types
#[derive(Debug)]
pub enum WallFollowerError {
    /// Range scan could not be reduced to edge readings
    PerceptionError(PerceptionError),
    /// Configuration error
    ConfigError(String),
    /// Configuration file could not be read
    IoError(std::io::Error),
    /// Velocity command could not be delivered
    PublishError(String),
    /// ROS interface error
    RosError(String),
}

impl std::fmt::Display for WallFollowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            WallFollowerError::PerceptionError(err) => write!(f, "Perception error: {}", err),
            WallFollowerError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            WallFollowerError::IoError(err) => write!(f, "I/O error: {}", err),
            WallFollowerError::PublishError(msg) => write!(f, "Publish error: {}", msg),
            WallFollowerError::RosError(msg) => write!(f, "ROS error: {}", msg),
        }
    }
}

impl std::error::Error for WallFollowerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WallFollowerError::PerceptionError(err) => Some(err),
            WallFollowerError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PerceptionError> for WallFollowerError {
    fn from(err: PerceptionError) -> Self {
        WallFollowerError::PerceptionError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        let config = WallFollowerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.perception.front_index, 319);
        assert_eq!(config.perception.left_index, 639);
        assert_eq!(config.ros.cmd_vel_topic, "/mobile_base/commands/velocity");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = WallFollowerConfig::from_yaml_str(
            "thresholds:\n  following_distance_min: 0.4\nmotion:\n  stop_hold_ticks: 5\n",
        )
        .unwrap();

        assert_eq!(config.thresholds.following_distance_min, 0.4);
        assert_eq!(config.thresholds.laser_distance_max, 1.0);
        assert_eq!(config.motion.stop_hold_ticks, 5);
        assert_eq!(config.motion.control_rate_hz, 100.0);
    }

    #[test]
    fn test_swapped_indices_rejected() {
        let err = WallFollowerConfig::from_yaml_str(
            "perception:\n  front_index: 700\n  left_index: 639\n",
        )
        .unwrap_err();
        assert!(matches!(err, WallFollowerError::ConfigError(_)));
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let mut config = WallFollowerConfig::default();
        config.motion.control_rate_hz = 0.0;
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case("1.0e-20")]
    #[case("1.0e12")]
    fn test_unrepresentable_rate_rejected(#[case] rate: &str) {
        let yaml = format!("motion:\n  control_rate_hz: {}\n", rate);
        let err = WallFollowerConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, WallFollowerError::ConfigError(_)));
        assert!(err.to_string().contains("control_rate_hz"));
    }

    #[test]
    fn test_inverted_dead_band_rejected() {
        let mut config = WallFollowerConfig::default();
        config.thresholds.laser_distance_min = 2.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("laser_distance_min"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = WallFollowerConfig::from_file("/nonexistent/wall_follower.yaml").unwrap_err();
        assert!(matches!(err, WallFollowerError::IoError(_)));
    }
}
