//! Per-frame game loop: owns every piece of run state and advances it one tick at a time.
//!
//! Within a tick the order is fixed: phase signals, Δt sanitising, flight,
//! obstacle spawn/advance/recycle/score, collision, camera. Nothing after the
//! collision check mutates the run once it has ended.

use engine_core::{sanitize_delta, Pose, Vec3};
use input::FrameInput;
use physics::first_overlap;

use crate::camera::ChaseCamera;
use crate::config::GameConfig;
use crate::events::GameEvent;
use crate::flight::Vehicle;
use crate::hud::{radar_blips, GameOverSummary, HudData, RadarBlip};
use crate::obstacle::{ObstacleId, ObstaclePool};
use crate::scoring::{cruise_speed, RunPhase, RunState};
use crate::spawner::ObstacleSpawner;

/// Read-only view of one obstacle for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub position: Vec3,
    /// Euler angles (x, y, z) in radians.
    pub rotation: Vec3,
    pub kind_id: u8,
    /// Idle bob to add to `position.y` when drawing.
    pub bob: f32,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub vehicle: Pose,
    pub obstacles: Vec<ObstacleView>,
    pub phase: RunPhase,
    pub hud: HudData,
    pub radar: Vec<RadarBlip>,
    pub camera: ChaseCamera,
}

/// One player's game: vehicle, obstacle field, run state and camera.
pub struct Session {
    config: GameConfig,
    vehicle: Vehicle,
    pool: ObstaclePool,
    spawner: ObstacleSpawner,
    run: RunState,
    camera: ChaseCamera,
}

impl Session {
    /// New session on the start screen with the corridor already populated.
    pub fn new(config: GameConfig) -> Self {
        let vehicle = Vehicle::new(&config.flight);
        let mut pool = ObstaclePool::with_capacity(config.spawn.max_obstacles);
        let mut spawner = ObstacleSpawner::new(config.seed);
        spawner.prepopulate(&mut pool, vehicle.position, &config.spawn);
        let run = RunState::new(&config.spawn);
        let camera = ChaseCamera::new(&config.camera);

        log::info!(
            "Session ready: {} obstacles, seed {:?}",
            pool.len(),
            config.seed
        );

        Self {
            config,
            vehicle,
            pool,
            spawner,
            run,
            camera,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn obstacles(&self) -> &ObstaclePool {
        &self.pool
    }

    /// Mutable obstacle access for hosts that script the field (editors, tests).
    pub fn obstacles_mut(&mut self) -> &mut ObstaclePool {
        &mut self.pool
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    /// Advance the game by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32, input: &FrameInput) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if input.restart_requested && self.restart() {
            events.push(GameEvent::RunReset);
        }

        let control = input.control.sanitized();
        if self.run.phase == RunPhase::NotStarted
            && (input.start_requested || !control.is_idle())
            && self.start()
        {
            events.push(GameEvent::RunStarted);
        }

        let Some(dt) = sanitize_delta(dt, self.config.max_frame_delta) else {
            log::trace!("Skipping tick with unusable delta {}", dt);
            return events;
        };
        if !self.run.is_running() {
            return events;
        }

        self.run.advance_clock(dt);
        self.vehicle.update(control, dt, &self.config.flight);
        self.update_obstacles(dt, &mut events);

        if let Some(id) = self.detect_collision() {
            self.run.end();
            let summary = GameOverSummary::new(&self.run);
            log::info!(
                "Crashed into obstacle {} ({}) at score {}",
                id.0,
                self.pool.get(id).map(|o| o.kind().name()).unwrap_or("?"),
                summary.final_score
            );
            events.push(GameEvent::Collision { id });
            events.push(GameEvent::RunEnded(summary));
        }

        self.camera.follow(&self.vehicle.pose(), &self.config.camera);
        events
    }

    /// `NotStarted → Running` with a fresh vehicle and run clock.
    fn start(&mut self) -> bool {
        if !self.run.start(&self.config.spawn) {
            return false;
        }
        self.vehicle.reset(&self.config.flight);
        log::info!("Run started with {} obstacles in the field", self.pool.len());
        true
    }

    /// `Ended → NotStarted`. Keeps every obstacle slot but moves it back out
    /// ahead of the origin.
    fn restart(&mut self) -> bool {
        if !self.run.restart(&self.config.spawn) {
            return false;
        }
        self.vehicle.reset(&self.config.flight);
        self.camera.reset(&self.config.camera);

        let anchor = self.vehicle.position;
        for obstacle in self.pool.iter_mut() {
            self.spawner.recycle(obstacle, anchor, &self.config.spawn);
        }
        self.pool.rearm_saturation_log();
        self.spawner
            .prepopulate(&mut self.pool, anchor, &self.config.spawn);

        log::info!("Run reset; {} obstacles re-placed", self.pool.len());
        true
    }

    fn update_obstacles(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        let spawn = &self.config.spawn;
        if !ObstacleSpawner::is_active(&self.run, spawn) {
            return;
        }

        let anchor = self.vehicle.position;
        let report = self
            .spawner
            .update(&mut self.run, &mut self.pool, anchor, spawn);
        if report.total() > 0 {
            log::debug!(
                "Spawned {} regular + {} edge obstacles (pool {})",
                report.regular,
                report.edge,
                self.pool.len()
            );
        }

        let distance = self.run.game_speed * spawn.advance_rate * dt;
        let threshold = anchor.z + spawn.trailing_distance;
        for obstacle in self.pool.iter_mut() {
            obstacle.advance(distance, dt);
            if obstacle.position.z <= threshold {
                continue;
            }

            self.spawner.recycle(obstacle, anchor, spawn);
            if obstacle.scored {
                continue;
            }
            obstacle.scored = true;

            let outcome = self.run.record_pass(&self.config.scoring);
            events.push(GameEvent::ObstacleScored {
                id: obstacle.id,
                score: outcome.score,
            });
            if let Some(game_speed) = outcome.game_speed {
                log::debug!("Game speed now {:.2} at score {}", game_speed, outcome.score);
                events.push(GameEvent::GameSpeedIncreased { game_speed });
            }
            if let Some(milestone) = outcome.cruise_milestone {
                let speed = cruise_speed(milestone, &self.config.flight, &self.config.scoring);
                self.vehicle.raise_speed(speed);
                log::info!(
                    "Cruise speed raised to {:.2} at score {}",
                    self.vehicle.speed,
                    outcome.score
                );
                events.push(GameEvent::CruiseSpeedIncreased {
                    milestone,
                    speed: self.vehicle.speed,
                });
            }
        }
    }

    /// First obstacle (slot order) whose box overlaps the vehicle's.
    fn detect_collision(&self) -> Option<ObstacleId> {
        let probe = self.vehicle.aabb();
        first_overlap(&probe, self.pool.iter().map(|o| o.aabb())).map(|i| ObstacleId(i as u32))
    }

    /// Summary of the finished run, if it has ended.
    pub fn game_over(&self) -> Option<GameOverSummary> {
        (self.run.phase == RunPhase::Ended).then(|| GameOverSummary::new(&self.run))
    }

    pub fn hud(&self) -> HudData {
        HudData::new(&self.run, self.vehicle.position)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let obstacles = self
            .pool
            .iter()
            .map(|o| ObstacleView {
                id: o.id,
                position: o.position,
                rotation: o.rotation,
                kind_id: o.kind().id(),
                bob: o.bob_offset(self.run.clock),
            })
            .collect();

        FrameSnapshot {
            vehicle: self.vehicle.pose(),
            obstacles,
            phase: self.run.phase,
            hud: self.hud(),
            radar: radar_blips(self.vehicle.position, &self.pool, self.config.radar_radius),
            camera: self.camera,
        }
    }
}
