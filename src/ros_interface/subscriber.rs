// src/ros_interface/subscriber.rs
// Subscribes to the range scan and odometry topics and hands pending messages
// to the decision loop without blocking.

use futures::stream::Stream;
use futures::{FutureExt, StreamExt};
use r2r::nav_msgs::msg::Odometry;
use r2r::sensor_msgs::msg::LaserScan;
use r2r::{Node, QosProfile};
use std::time::Duration;

use crate::sensing::{Pose2D, SensorFeed, SensorMessage};

type Subscription<T> = Box<dyn Stream<Item = T> + Unpin + Send>;

/// Owns the node and its subscriptions.
/// - `scans`: LaserScan stream
/// - `odometry`: Odometry stream
pub struct RosSensorFeed {
    node: Node,
    scans: Subscription<LaserScan>,
    odometry: Subscription<Odometry>,
}

impl RosSensorFeed {
    /// Subscribes to `scan_topic` and `odom_topic` on `node`
    pub fn new(
        mut node: Node,
        scan_topic: &str,
        odom_topic: &str,
        qos: QosProfile,
    ) -> Result<Self, r2r::Error> {
        let scans = Box::new(node.subscribe::<LaserScan>(scan_topic, qos.clone())?);
        let odometry = Box::new(node.subscribe::<Odometry>(odom_topic, qos)?);

        Ok(RosSensorFeed {
            node,
            scans,
            odometry,
        })
    }
}

impl SensorFeed for RosSensorFeed {
    fn drain(&mut self) -> Vec<SensorMessage> {
        // Zero timeout: take what the middleware already holds
        self.node.spin_once(Duration::ZERO);

        let mut messages = Vec::new();
        while let Some(Some(scan)) = self.scans.next().now_or_never() {
            messages.push(SensorMessage::Scan(scan.ranges));
        }
        while let Some(Some(odom)) = self.odometry.next().now_or_never() {
            messages.push(SensorMessage::Odometry(pose_from_odometry(&odom)));
        }
        messages
    }
}

/// Convert an odometry message to a planar pose
pub fn pose_from_odometry(odom: &Odometry) -> Pose2D {
    let position = &odom.pose.pose.position;
    let q = &odom.pose.pose.orientation;
    Pose2D::from_odometry(position.x, position.y, q.x, q.y, q.z, q.w)
}
