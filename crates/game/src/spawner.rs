//! Obstacle spawn scheduling and placement.
//!
//! A run opens with a pre-populated corridor. After a short start delay,
//! regular waves of obstacles appear on a fixed interval, and a single edge
//! obstacle lands in one of the four bands around the vehicle on a slightly
//! longer interval, so hugging the edge of the field is never safe. Interval
//! and wave size never escalate.

use std::time::Duration;

use engine_core::Vec3;
use rand::prelude::*;

use crate::config::SpawnTuning;
use crate::obstacle::{Obstacle, ObstacleId, ObstacleKind, ObstaclePool};
use crate::scoring::RunState;

/// One of the four bands around the vehicle used by edge spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeBand {
    Left,
    Right,
    Top,
    Bottom,
}

impl EdgeBand {
    pub const ALL: [EdgeBand; 4] = [EdgeBand::Left, EdgeBand::Right, EdgeBand::Top, EdgeBand::Bottom];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Where a new obstacle goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Anywhere in the regular spread window.
    Regular,
    /// Inside one edge band.
    Edge(EdgeBand),
}

/// Spawns produced by one scheduler update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub regular: usize,
    pub edge: usize,
}

impl SpawnReport {
    pub fn total(&self) -> usize {
        self.regular + self.edge
    }
}

/// Decides when and where obstacles appear.
pub struct ObstacleSpawner {
    /// Random number generator.
    rng: StdRng,
    /// Obstacles created since the session began.
    pub spawned_total: u64,
}

impl ObstacleSpawner {
    /// Seeded spawner for reproducible runs, or entropy-seeded when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            spawned_total: 0,
        }
    }

    /// True once the run clock has passed the start delay.
    pub fn is_active(run: &RunState, tuning: &SpawnTuning) -> bool {
        run.clock.as_millis() >= u128::from(tuning.start_delay_ms)
    }

    fn forward_distance(&mut self, tuning: &SpawnTuning) -> f32 {
        tuning.base_distance + self.rng.gen::<f32>() * tuning.distance_jitter
    }

    fn centered(&mut self, width: f32) -> f32 {
        (self.rng.gen::<f32>() - 0.5) * width
    }

    fn random_rotation(&mut self) -> Vec3 {
        let tau = std::f32::consts::TAU;
        Vec3::new(
            self.rng.gen::<f32>() * tau,
            self.rng.gen::<f32>() * tau,
            self.rng.gen::<f32>() * tau,
        )
    }

    /// Position for a new or recycled obstacle, ahead of `anchor` (the vehicle) along -Z.
    pub fn position(&mut self, anchor: Vec3, placement: Placement, tuning: &SpawnTuning) -> Vec3 {
        let z = anchor.z - self.forward_distance(tuning);
        let (x, y) = match placement {
            Placement::Regular => (
                anchor.x + self.centered(tuning.spread.x),
                anchor.y + self.centered(tuning.spread.y),
            ),
            Placement::Edge(EdgeBand::Left) => (
                anchor.x - tuning.edge_offset.x,
                anchor.y + self.centered(tuning.edge_spread),
            ),
            Placement::Edge(EdgeBand::Right) => (
                anchor.x + tuning.edge_offset.x,
                anchor.y + self.centered(tuning.edge_spread),
            ),
            Placement::Edge(EdgeBand::Top) => (
                anchor.x + self.centered(tuning.edge_spread),
                anchor.y + tuning.edge_offset.y,
            ),
            Placement::Edge(EdgeBand::Bottom) => (
                anchor.x + self.centered(tuning.edge_spread),
                anchor.y - tuning.edge_offset.y,
            ),
        };
        Vec3::new(x, y, z)
    }

    /// Create one obstacle of a random archetype. `None` when the pool is full.
    pub fn spawn(
        &mut self,
        pool: &mut ObstaclePool,
        anchor: Vec3,
        placement: Placement,
        tuning: &SpawnTuning,
    ) -> Option<ObstacleId> {
        if pool.is_full() {
            pool.note_full();
            return None;
        }
        let kind = ObstacleKind::random(&mut self.rng);
        let mut obstacle = Obstacle::new(ObstacleId(0), kind, &mut self.rng);
        obstacle.position = self.position(anchor, placement, tuning);
        obstacle.rotation = self.random_rotation();
        let id = pool.insert_with(move |_| obstacle)?;
        self.spawned_total += 1;
        Some(id)
    }

    /// Top the pool up to the pre-population count. Returns how many were added.
    pub fn prepopulate(&mut self, pool: &mut ObstaclePool, anchor: Vec3, tuning: &SpawnTuning) -> usize {
        let missing = tuning.prepopulate_count.saturating_sub(pool.len());
        let added = (0..missing)
            .filter_map(|_| self.spawn(pool, anchor, Placement::Regular, tuning))
            .count();
        if added > 0 {
            log::debug!("Pre-populated {} obstacles", added);
        }
        added
    }

    /// Move an obstacle back out ahead of `anchor` as if newly spawned and clear its pass flag.
    pub fn recycle(&mut self, obstacle: &mut Obstacle, anchor: Vec3, tuning: &SpawnTuning) {
        obstacle.position = self.position(anchor, Placement::Regular, tuning);
        obstacle.rotation = self.random_rotation();
        obstacle.scored = false;
    }

    /// Time between edge spawns. Saturates instead of overflowing.
    fn edge_interval(run: &RunState, tuning: &SpawnTuning) -> Duration {
        Duration::try_from_secs_f32(run.spawn_interval.as_secs_f32() * tuning.edge_interval_factor)
            .unwrap_or(Duration::MAX)
    }

    /// Run the timed and edge schedules against the run clock.
    pub fn update(
        &mut self,
        run: &mut RunState,
        pool: &mut ObstaclePool,
        anchor: Vec3,
        tuning: &SpawnTuning,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        if !Self::is_active(run, tuning) {
            return report;
        }

        if run.clock.saturating_sub(run.last_spawn) >= run.spawn_interval {
            for _ in 0..run.multi_spawn_count {
                if self.spawn(pool, anchor, Placement::Regular, tuning).is_some() {
                    report.regular += 1;
                }
            }
            run.last_spawn = run.clock;
        }

        let edge_interval = Self::edge_interval(run, tuning);
        if run.clock.saturating_sub(run.last_edge_spawn) >= edge_interval {
            let band = EdgeBand::random(&mut self.rng);
            if self.spawn(pool, anchor, Placement::Edge(band), tuning).is_some() {
                report.edge += 1;
            }
            run.last_edge_spawn = run.clock;
        }

        report
    }
}
