//! Scripted pilot for the headless demo. Presses and releases keys on an
//! [`InputState`] the same way a keyboard would.

use std::collections::HashSet;

use engine_core::Vec3;
use input::{ElementState, InputState, KeyCode};

use crate::flight::Vehicle;
use crate::obstacle::{Obstacle, ObstaclePool};

/// How far ahead obstacles are considered threats.
const LOOKAHEAD: f32 = 160.0;
/// Lateral and vertical half-width of the corridor the pilot keeps clear.
const CORRIDOR: Vec3 = Vec3::new(12.0, 9.0, 0.0);
/// Stop diving this close to the sea floor.
const FLOOR_MARGIN: f32 = 4.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    held: HashSet<KeyCode>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closest obstacle ahead of the vehicle that sits inside its corridor.
    pub fn nearest_threat<'a>(vehicle: &Vehicle, pool: &'a ObstaclePool) -> Option<&'a Obstacle> {
        let p = vehicle.position;
        pool.iter()
            .filter(|o| {
                let ahead = p.z - o.position.z;
                ahead > 0.0
                    && ahead < LOOKAHEAD
                    && (o.position.x - p.x).abs() < CORRIDOR.x
                    && (o.position.y - p.y).abs() < CORRIDOR.y
            })
            .min_by(|a, b| b.position.z.total_cmp(&a.position.z))
    }

    /// Keys to hold this frame: turn and climb or dive away from the nearest threat.
    pub fn choose_keys(vehicle: &Vehicle, pool: &ObstaclePool, floor: f32) -> HashSet<KeyCode> {
        let mut keys = HashSet::new();
        let Some(threat) = Self::nearest_threat(vehicle, pool) else {
            return keys;
        };
        let p = vehicle.position;

        // A turns toward -X, D toward +X.
        keys.insert(if threat.position.x >= p.x {
            KeyCode::KeyA
        } else {
            KeyCode::KeyD
        });

        let near_floor = p.y - floor < FLOOR_MARGIN;
        keys.insert(if threat.position.y > p.y && !near_floor {
            KeyCode::KeyW
        } else {
            KeyCode::KeyS
        });
        keys
    }

    /// Update held keys on `input` for this frame. Call after `InputState::begin_frame`.
    pub fn drive(&mut self, vehicle: &Vehicle, pool: &ObstaclePool, floor: f32, input: &mut InputState) {
        let wanted = Self::choose_keys(vehicle, pool, floor);
        for key in self.held.difference(&wanted) {
            input.process_keyboard(*key, ElementState::Released);
        }
        for key in wanted.difference(&self.held) {
            input.process_keyboard(*key, ElementState::Pressed);
        }
        self.held = wanted;
    }

    /// Let go of every key.
    pub fn release(&mut self, input: &mut InputState) {
        for key in self.held.drain() {
            input.process_keyboard(key, ElementState::Released);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlightTuning;
    use crate::obstacle::{ObstacleId, ObstacleKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool_with(positions: &[Vec3]) -> ObstaclePool {
        let mut rng = StdRng::seed_from_u64(21);
        let mut pool = ObstaclePool::with_capacity(positions.len());
        for &pos in positions {
            pool.insert_with(|id| {
                let mut o = Obstacle::new(id, ObstacleKind::Box, &mut rng);
                o.position = pos;
                o
            });
        }
        pool
    }

    #[test]
    fn picks_closest_obstacle_in_corridor() {
        let vehicle = Vehicle::new(&FlightTuning::default());
        let pool = pool_with(&[
            Vec3::new(0.0, 0.0, -120.0),
            Vec3::new(3.0, 0.0, -60.0),
            Vec3::new(50.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ]);
        let threat = Autopilot::nearest_threat(&vehicle, &pool).map(|o| o.id);
        assert_eq!(threat, Some(ObstacleId(1)));
    }

    #[test]
    fn steers_away_from_threat() {
        let tuning = FlightTuning::default();
        let vehicle = Vehicle::new(&tuning);
        let pool = pool_with(&[Vec3::new(2.0, 1.0, -40.0)]);
        let keys = Autopilot::choose_keys(&vehicle, &pool, tuning.floor());
        assert!(keys.contains(&KeyCode::KeyA));
        assert!(keys.contains(&KeyCode::KeyW));
    }

    #[test]
    fn climbs_instead_of_diving_near_floor() {
        let tuning = FlightTuning::default();
        let mut vehicle = Vehicle::new(&tuning);
        vehicle.position.y = tuning.floor() + 1.0;
        let pool = pool_with(&[Vec3::new(-2.0, vehicle.position.y + 2.0, -40.0)]);
        let keys = Autopilot::choose_keys(&vehicle, &pool, tuning.floor());
        assert!(keys.contains(&KeyCode::KeyD));
        assert!(keys.contains(&KeyCode::KeyS));
    }

    #[test]
    fn drive_presses_and_releases_keys() {
        let tuning = FlightTuning::default();
        let vehicle = Vehicle::new(&tuning);
        let mut input = InputState::new();
        let mut pilot = Autopilot::new();

        let pool = pool_with(&[Vec3::new(-2.0, -1.0, -40.0)]);
        pilot.drive(&vehicle, &pool, tuning.floor(), &mut input);
        assert!(input.is_key_held(KeyCode::KeyD));
        assert!(input.is_key_held(KeyCode::KeyS));
        assert_eq!(input.control_input().yaw, -1.0);

        input.begin_frame();
        let empty = pool_with(&[]);
        pilot.drive(&vehicle, &empty, tuning.floor(), &mut input);
        assert!(input.is_key_released(KeyCode::KeyD));
        assert!(input.control_input().is_idle());
    }
}
