//! ROS 2 interface for the wall follower
//!
//! This module handles all communication with ROS 2, including:
//! - Subscribing to range scans and odometry
//! - Publishing velocity commands
//! - Managing the node
//!
//! Only built with the `ros` feature.

mod publisher;
mod subscriber;

use r2r::{Context, Node, QosProfile};

use crate::{RosConfig, WallFollowerError};

pub use publisher::*;
pub use subscriber::*;

impl From<r2r::Error> for WallFollowerError {
    fn from(err: r2r::Error) -> Self {
        WallFollowerError::RosError(err.to_string())
    }
}

/// ROS 2 interface manager
pub struct RosInterface;

impl RosInterface {
    /// Creates the node, its subscriptions and the velocity publisher.
    ///
    /// The returned feed owns the node and must be drained regularly for
    /// messages to arrive.
    pub fn connect(config: &RosConfig) -> Result<(RosSensorFeed, CmdVelPublisher), WallFollowerError> {
        log::info!("Initializing ROS interface...");

        let context = Context::create()?;
        let mut node = Node::create(context, &config.node_name, &config.namespace)?;

        let sensor_qos = QosProfile::default().keep_last(config.qos_depth);
        let cmd_vel_qos = QosProfile::default().keep_last(config.cmd_vel_qos_depth);

        let publisher = CmdVelPublisher::new(&mut node, &config.cmd_vel_topic, cmd_vel_qos)?;
        let feed = RosSensorFeed::new(node, &config.scan_topic, &config.odom_topic, sensor_qos)?;

        log::info!(
            "ROS interface ready: scans on {}, odometry on {}, commands to {}",
            config.scan_topic,
            config.odom_topic,
            config.cmd_vel_topic
        );
        Ok((feed, publisher))
    }
}
