use r2r::QosProfile;
use r2r::geometry_msgs::msg::{Twist, Vector3};

use crate::WallFollowerError;
use crate::navigation::{VelocityCommand, VelocityPublisher};

/// Velocity command publisher on a geometry_msgs/Twist topic
pub struct CmdVelPublisher {
    inner: r2r::Publisher<Twist>,
}

impl CmdVelPublisher {
    /// Create a new publisher on the given topic with specified QoS
    pub fn new(node: &mut r2r::Node, topic: &str, qos: QosProfile) -> Result<Self, r2r::Error> {
        let publisher = node.create_publisher::<Twist>(topic, qos)?;
        Ok(CmdVelPublisher { inner: publisher })
    }
}

impl VelocityPublisher for CmdVelPublisher {
    fn publish(&mut self, command: VelocityCommand) -> Result<(), WallFollowerError> {
        self.inner
            .publish(&to_twist(command))
            .map_err(|e| WallFollowerError::PublishError(e.to_string()))
    }
}

/// Convert a velocity command to a ROS Twist message
pub fn to_twist(command: VelocityCommand) -> Twist {
    Twist {
        linear: Vector3 {
            x: command.linear_x,
            y: 0.0,
            z: 0.0,
        },
        angular: Vector3 {
            x: 0.0,
            y: 0.0,
            z: command.angular_z,
        },
    }
}
