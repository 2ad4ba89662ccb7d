//! Chase camera: trails the vehicle with exponential smoothing.

use engine_core::{Pose, Vec3};

use crate::config::CameraTuning;

/// Camera pose handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl ChaseCamera {
    /// Camera at its resting pose (start screen).
    pub fn new(tuning: &CameraTuning) -> Self {
        Self {
            position: tuning.rest_position,
            look_at: tuning.rest_look_at,
        }
    }

    pub fn reset(&mut self, tuning: &CameraTuning) {
        *self = Self::new(tuning);
    }

    /// Where the camera wants to be for this vehicle pose: `(position, look_at)`.
    ///
    /// Only a narrow band of yaw reaches the camera so hard turns do not whip it around.
    pub fn target(vehicle: &Pose, tuning: &CameraTuning) -> (Vec3, Vec3) {
        let yaw = vehicle
            .orientation
            .yaw
            .clamp(-tuning.max_yaw_influence, tuning.max_yaw_influence);
        let p = vehicle.position;

        let position = Vec3::new(
            p.x - yaw.sin() * tuning.lateral_offset,
            p.y + tuning.height,
            p.z + tuning.distance_behind,
        );
        let look_at = Vec3::new(
            p.x + yaw.sin() * tuning.look_lateral,
            p.y + tuning.look_height,
            p.z - tuning.look_ahead,
        );
        (position, look_at)
    }

    /// Close a fixed fraction of the gap to the target pose.
    pub fn follow(&mut self, vehicle: &Pose, tuning: &CameraTuning) {
        let (position, look_at) = Self::target(vehicle, tuning);
        self.position += (position - self.position) * tuning.smoothing;
        self.look_at += (look_at - self.look_at) * tuning.smoothing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Orientation;

    #[test]
    fn follow_never_snaps() {
        let tuning = CameraTuning::default();
        let mut cam = ChaseCamera::new(&tuning);
        let vehicle = Pose::new(Vec3::new(100.0, 0.0, -500.0), Orientation::ZERO);
        let (target, _) = ChaseCamera::target(&vehicle, &tuning);
        let before = (target - cam.position).length();
        cam.follow(&vehicle, &tuning);
        let after = (target - cam.position).length();
        assert!((after - before * 0.92).abs() < 1e-2);
    }

    #[test]
    fn converges_on_steady_vehicle() {
        let tuning = CameraTuning::default();
        let mut cam = ChaseCamera::new(&tuning);
        let vehicle = Pose::new(Vec3::new(3.0, 4.0, -50.0), Orientation::ZERO);
        for _ in 0..300 {
            cam.follow(&vehicle, &tuning);
        }
        assert!((cam.position - Vec3::new(3.0, 16.0, -30.0)).length() < 1e-3);
        assert!((cam.look_at - Vec3::new(3.0, 6.0, -80.0)).length() < 1e-3);
    }

    #[test]
    fn yaw_influence_is_clamped() {
        let tuning = CameraTuning::default();
        let slight = Pose::new(Vec3::ZERO, Orientation::new(0.0, tuning.max_yaw_influence, 0.0));
        let hard = Pose::new(Vec3::ZERO, Orientation::new(0.0, 1.0, 0.0));
        assert_eq!(ChaseCamera::target(&slight, &tuning), ChaseCamera::target(&hard, &tuning));
        // Positive yaw swings the camera toward -X.
        assert!(ChaseCamera::target(&hard, &tuning).0.x < 0.0);
    }
}
