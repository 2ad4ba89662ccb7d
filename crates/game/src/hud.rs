//! HUD (Heads-Up Display) data: derived readouts, radar feed and the game-over card.

use engine_core::Vec3;

use crate::obstacle::{ObstacleId, ObstaclePool};
use crate::scoring::{RunPhase, RunState};

/// Speedometer reading for a game speed.
pub fn speed_display(game_speed: f32) -> u32 {
    (120.0 + game_speed * 50.0).round().max(0.0) as u32
}

/// Altimeter reading for a vehicle height.
pub fn altitude_display(height: f32) -> i32 {
    (1000.0 + height * 10.0).round() as i32
}

/// Health bar percentage. Drains as the score climbs.
pub fn health_display(score: u32) -> f32 {
    (100.0 - score as f32 * 0.5).max(0.0)
}

/// Readouts for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudData {
    pub phase: RunPhase,
    pub score: u32,
    pub speed: u32,
    pub altitude: i32,
    /// 0–100.
    pub health: f32,
}

impl HudData {
    pub fn new(run: &RunState, vehicle_position: Vec3) -> Self {
        Self {
            phase: run.phase,
            score: run.score,
            speed: speed_display(run.game_speed),
            altitude: altitude_display(vehicle_position.y),
            health: health_display(run.score),
        }
    }

    /// One-line status for logs and terminals.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] score {:>5}  speed {:>4}  alt {:>5}  hp {:>5.1}",
            self.phase.name(),
            self.score,
            self.speed,
            self.altitude,
            self.health
        )
    }
}

/// One obstacle on the radar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarBlip {
    pub id: ObstacleId,
    /// `atan2(dx, dz)` from the vehicle, radians.
    pub bearing: f32,
    /// Ground distance as a fraction of the radar radius, in `[0, 1)`.
    pub distance: f32,
}

/// Obstacles within `radius` of the vehicle on the ground (XZ) plane, in slot order.
pub fn radar_blips(vehicle_position: Vec3, pool: &ObstaclePool, radius: f32) -> Vec<RadarBlip> {
    pool.iter()
        .filter_map(|o| {
            let dx = o.position.x - vehicle_position.x;
            let dz = o.position.z - vehicle_position.z;
            let d = (dx * dx + dz * dz).sqrt();
            (d < radius).then(|| RadarBlip {
                id: o.id,
                bearing: dx.atan2(dz),
                distance: d / radius,
            })
        })
        .collect()
}

/// Final stats shown on the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: u32,
    pub distance: u32,
    pub obstacles_avoided: u32,
    pub max_speed: u32,
}

impl GameOverSummary {
    pub fn new(run: &RunState) -> Self {
        Self {
            final_score: run.score,
            distance: (run.score as f32 * 0.5).round() as u32,
            obstacles_avoided: run.score,
            max_speed: speed_display(run.game_speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnTuning;
    use crate::obstacle::{Obstacle, ObstacleKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn readouts_match_formulas() {
        assert_eq!(speed_display(1.0), 170);
        assert_eq!(speed_display(1.1), 175);
        assert_eq!(altitude_display(0.0), 1000);
        assert_eq!(altitude_display(-12.0), 880);
        assert_eq!(health_display(0), 100.0);
        assert_eq!(health_display(50), 75.0);
        assert_eq!(health_display(500), 0.0);
    }

    #[test]
    fn hud_reflects_run_state() {
        let spawn = SpawnTuning::default();
        let mut run = RunState::new(&spawn);
        run.start(&spawn);
        run.score = 20;
        let hud = HudData::new(&run, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(hud.phase, RunPhase::Running);
        assert_eq!(hud.altitude, 1050);
        assert_eq!(hud.health, 90.0);
        assert!(hud.status_line().contains("FLYING"));
    }

    #[test]
    fn radar_omits_far_obstacles() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = ObstaclePool::with_capacity(4);
        for pos in [
            Vec3::new(0.0, 0.0, -50.0),
            Vec3::new(0.0, 0.0, -150.0),
            Vec3::new(30.0, 500.0, 0.0),
        ] {
            pool.insert_with(|id| {
                let mut o = Obstacle::new(id, ObstacleKind::Sphere, &mut rng);
                o.position = pos;
                o
            });
        }
        let blips = radar_blips(Vec3::ZERO, &pool, 100.0);
        assert_eq!(blips.len(), 2);
        assert_eq!(blips[0].id, ObstacleId(0));
        assert!((blips[0].distance - 0.5).abs() < 1e-6);
        assert!((blips[0].bearing.abs() - std::f32::consts::PI).abs() < 1e-6);
        // Height is ignored.
        assert_eq!(blips[1].id, ObstacleId(2));
        assert!((blips[1].bearing - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn summary_uses_final_state() {
        let spawn = SpawnTuning::default();
        let mut run = RunState::new(&spawn);
        run.score = 37;
        run.game_speed = 1.03;
        let s = GameOverSummary::new(&run);
        assert_eq!(s.final_score, 37);
        assert_eq!(s.distance, 19);
        assert_eq!(s.obstacles_avoided, 37);
        assert_eq!(s.max_speed, 172);
    }
}
