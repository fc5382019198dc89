// sensing/localization.rs

// Robot pose as reported by odometry. Yaw is recovered from the orientation
// quaternion. The wall follower records the pose but does not steer by it.

use nalgebra::{Quaternion, UnitQuaternion};

/// Planar pose in the odometry frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    /// X position (meters)
    pub x: f64,
    /// Y position (meters)
    pub y: f64,
    /// Heading (radians, counter-clockwise positive)
    pub yaw: f64,
}

impl Pose2D {
    /// Creates a pose from its components
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Pose2D { x, y, yaw }
    }

    /// Builds a pose from an odometry position and orientation quaternion.
    ///
    /// A degenerate (zero-norm) quaternion yields a heading of 0.
    pub fn from_odometry(x: f64, y: f64, qx: f64, qy: f64, qz: f64, qw: f64) -> Self {
        Pose2D {
            x,
            y,
            yaw: yaw_from_quaternion(qx, qy, qz, qw),
        }
    }
}

/// Heading about the z axis of an orientation quaternion
pub fn yaw_from_quaternion(qx: f64, qy: f64, qz: f64, qw: f64) -> f64 {
    UnitQuaternion::try_new(Quaternion::new(qw, qx, qy, qz), f64::EPSILON)
        .map(|orientation| orientation.euler_angles().2)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_identity_orientation() {
        let pose = Pose2D::from_odometry(1.5, -2.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(pose.x, 1.5);
        assert_eq!(pose.y, -2.0);
        assert!(pose.yaw.abs() < EPS);
    }

    #[test]
    fn test_quarter_turn_left() {
        let yaw = yaw_from_quaternion(0.0, 0.0, FRAC_PI_4.sin(), FRAC_PI_4.cos());
        assert!((yaw - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_unnormalized_quaternion() {
        // Half turn scaled by 3
        let yaw = yaw_from_quaternion(0.0, 0.0, 3.0, 0.0);
        assert!((yaw.abs() - PI).abs() < EPS);
    }

    #[test]
    fn test_degenerate_quaternion() {
        assert_eq!(yaw_from_quaternion(0.0, 0.0, 0.0, 0.0), 0.0);
    }
}
