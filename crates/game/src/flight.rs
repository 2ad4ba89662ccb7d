//! Flight model: integrates control input into the vehicle's orientation and position.

use engine_core::{Orientation, Pose, Vec3};
use input::ControlInput;
use physics::{Aabb, BoundingShape, Collider};

use crate::config::FlightTuning;

/// The player's aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub position: Vec3,
    /// Every angle stays within `±FlightTuning::max_angle`.
    pub orientation: Orientation,
    /// Cruise speed. Only rises within a run.
    pub speed: f32,
    /// Airframe box, built from the tuned half extents.
    collider: Collider,
}

impl Vehicle {
    /// Vehicle at the origin, level, at base speed.
    pub fn new(tuning: &FlightTuning) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Orientation::ZERO,
            speed: tuning.base_speed,
            collider: Collider::new(BoundingShape::Cuboid {
                half_extents: tuning.half_extents,
            }),
        }
    }

    pub fn reset(&mut self, tuning: &FlightTuning) {
        *self = Self::new(tuning);
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// Raise cruise speed. Never lowers it.
    pub fn raise_speed(&mut self, speed: f32) {
        self.speed = self.speed.max(speed);
    }

    /// World-space collision box of the airframe.
    pub fn aabb(&self) -> Aabb {
        self.collider
            .world_aabb(self.position, self.orientation.to_quat())
    }

    /// Rotation step for a full control request at the current speed.
    pub fn control_sensitivity(&self, tuning: &FlightTuning) -> f32 {
        tuning.base_sensitivity + (self.speed - tuning.base_speed) * tuning.sensitivity_gain
    }

    /// Per-tick auto-level factor; loosens as speed rises, floored at the minimum.
    pub fn auto_level_factor(&self, tuning: &FlightTuning) -> f32 {
        let factor = tuning.auto_level - (self.speed - tuning.base_speed) * tuning.auto_level_gain;
        factor.max(tuning.min_auto_level)
    }

    /// World units covered per second per unit of speed.
    pub fn move_multiplier(&self, tuning: &FlightTuning) -> f32 {
        tuning.base_move_multiplier + (self.speed - tuning.base_speed) * tuning.move_multiplier_gain
    }

    /// Advance one tick. `dt` must already be sanitised.
    pub fn update(&mut self, control: ControlInput, dt: f32, tuning: &FlightTuning) {
        let control = control.sanitized();
        let sensitivity = self.control_sensitivity(tuning);

        let steered = Orientation::new(
            self.orientation.pitch + control.pitch * sensitivity,
            self.orientation.yaw + control.yaw * sensitivity,
            self.orientation.roll + control.roll * sensitivity,
        );
        self.orientation = steered
            .scaled(self.auto_level_factor(tuning))
            .clamped(tuning.max_angle);

        let direction = self.orientation.forward();
        let distance = self.speed * dt * self.move_multiplier(tuning);
        self.position += direction * distance;

        // Sea barrier; no other bounds.
        let floor = tuning.floor();
        if self.position.y < floor {
            self.position.y = floor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn idle_flight_goes_straight_ahead() {
        let tuning = FlightTuning::default();
        let mut v = Vehicle::new(&tuning);
        for _ in 0..60 {
            v.update(ControlInput::NONE, DT, &tuning);
        }
        assert_eq!(v.orientation, Orientation::ZERO);
        assert_eq!(v.position.x, 0.0);
        assert_eq!(v.position.y, 0.0);
        // 0.8 speed * 80 multiplier = 64 units per second
        assert!((v.position.z + 64.0).abs() < 0.01);
    }

    #[test]
    fn angles_never_exceed_limit() {
        let tuning = FlightTuning {
            base_sensitivity: 0.5,
            ..FlightTuning::default()
        };
        let mut v = Vehicle::new(&tuning);
        for i in 0..500 {
            let s = if i % 100 < 50 { 1.0 } else { -1.0 };
            v.update(ControlInput::new(s, -s, s), DT, &tuning);
            assert!(v.orientation.max_abs() <= tuning.max_angle);
        }
    }

    #[test]
    fn never_drops_below_sea_floor() {
        let tuning = FlightTuning::default();
        let mut v = Vehicle::new(&tuning);
        for _ in 0..600 {
            v.update(ControlInput::new(-1.0, 0.0, 0.0), DT, &tuning);
            assert!(v.position.y >= tuning.floor());
        }
        assert_eq!(v.position.y, tuning.floor());
    }

    #[test]
    fn held_pitch_settles_below_limit() {
        let tuning = FlightTuning::default();
        let mut v = Vehicle::new(&tuning);
        for _ in 0..200 {
            v.update(ControlInput::new(1.0, 0.0, 0.0), DT, &tuning);
        }
        // Equilibrium of (p + 0.035) * 0.92 = p is about 0.4 rad.
        assert!((v.orientation.pitch - 0.4025).abs() < 1e-3);
        assert!(v.position.y > 0.0);
    }

    #[test]
    fn faster_vehicle_turns_harder_and_levels_less() {
        let tuning = FlightTuning::default();
        let mut v = Vehicle::new(&tuning);
        let base_sens = v.control_sensitivity(&tuning);
        let base_level = v.auto_level_factor(&tuning);
        v.raise_speed(tuning.base_speed + 5.0);
        assert!(v.control_sensitivity(&tuning) > base_sens);
        assert!(v.auto_level_factor(&tuning) < base_level);
        assert_eq!(v.auto_level_factor(&tuning), tuning.min_auto_level);
        assert!(v.move_multiplier(&tuning) > tuning.base_move_multiplier);
    }

    #[test]
    fn speed_only_rises() {
        let tuning = FlightTuning::default();
        let mut v = Vehicle::new(&tuning);
        v.raise_speed(1.8);
        v.raise_speed(1.0);
        assert_eq!(v.speed, 1.8);
        v.reset(&tuning);
        assert_eq!(v.speed, tuning.base_speed);
    }

    #[test]
    fn airframe_box_follows_vehicle() {
        let tuning = FlightTuning::default();
        let mut v = Vehicle::new(&tuning);
        let level = v.aabb();
        assert!((level.half_extents() - tuning.half_extents).abs().max_element() < 1e-4);
        v.position = Vec3::new(10.0, 0.0, -50.0);
        v.orientation = Orientation::new(0.0, 0.5, 0.0);
        let turned = v.aabb();
        assert!((turned.min + turned.max - v.position * 2.0).abs().max_element() < 1e-3);
        assert!(turned.half_extents().z > tuning.half_extents.z);
    }

    #[test]
    fn nan_control_is_no_input() {
        let tuning = FlightTuning::default();
        let mut v = Vehicle::new(&tuning);
        v.update(ControlInput::new(f32::NAN, f32::INFINITY, 0.0), DT, &tuning);
        assert_eq!(v.orientation, Orientation::ZERO);
    }
}
