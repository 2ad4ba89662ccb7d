//! Orientation and pose types for the flying vehicle and the chase camera.

use glam::{Quat, Vec3};

/// Canonical forward direction (negative Z in right-handed coordinates).
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Euler orientation in radians, applied intrinsically in X → Y → Z order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about X (nose up is positive).
    pub pitch: f32,
    /// Rotation about Y (nose left is positive).
    pub yaw: f32,
    /// Rotation about Z.
    pub roll: f32,
}

impl Orientation {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Quaternion equivalent of this orientation.
    pub fn to_quat(&self) -> Quat {
        Quat::from_rotation_x(self.pitch)
            * Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_z(self.roll)
    }

    /// Canonical forward vector rotated by this orientation.
    pub fn forward(&self) -> Vec3 {
        self.to_quat() * FORWARD
    }

    /// Copy with every angle clamped to `[-limit, limit]`.
    pub fn clamped(&self, limit: f32) -> Self {
        Self {
            pitch: self.pitch.clamp(-limit, limit),
            yaw: self.yaw.clamp(-limit, limit),
            roll: self.roll.clamp(-limit, limit),
        }
    }

    /// Multiply every angle by `factor` (auto-leveling).
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            pitch: self.pitch * factor,
            yaw: self.yaw * factor,
            roll: self.roll * factor,
        }
    }

    /// Largest absolute angle.
    pub fn max_abs(&self) -> f32 {
        self.pitch.abs().max(self.yaw.abs()).max(self.roll.abs())
    }
}

/// Position plus orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Orientation,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn zero_orientation_faces_negative_z() {
        let f = Orientation::ZERO.forward();
        assert!((f - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn positive_yaw_turns_left() {
        let f = Orientation::new(0.0, FRAC_PI_2, 0.0).forward();
        assert!((f - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn positive_pitch_climbs() {
        let f = Orientation::new(0.3, 0.0, 0.0).forward();
        assert!(f.y > 0.0);
        assert!(f.z < 0.0);
    }

    #[test]
    fn clamp_limits_every_axis() {
        let o = Orientation::new(5.0, -5.0, 0.2).clamped(1.0);
        assert_eq!(o, Orientation::new(1.0, -1.0, 0.2));
        assert_eq!(o.max_abs(), 1.0);
    }
}
