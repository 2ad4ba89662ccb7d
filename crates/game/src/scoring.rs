//! Run state: phase machine, score and score-driven difficulty.
//!
//! Difficulty only ever rises inside a run: game speed steps up every
//! `game_speed_interval` points and cruise speed jumps at every
//! `cruise_milestone`. Spawn interval and wave size stay at their tuned
//! values for the whole run.

use std::time::Duration;

use crate::config::{FlightTuning, ScoringTuning, SpawnTuning};

/// Phase of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPhase {
    /// Start screen; nothing moves.
    #[default]
    NotStarted,
    Running,
    /// Crashed. State is frozen until restart.
    Ended,
}

impl RunPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RunPhase::NotStarted => "READY",
            RunPhase::Running => "FLYING",
            RunPhase::Ended => "GAME OVER",
        }
    }
}

/// What a counted pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassOutcome {
    pub score: u32,
    /// New game speed if this pass crossed a game-speed step.
    pub game_speed: Option<f32>,
    /// Milestone count (score / cruise_milestone) if this pass reached one.
    pub cruise_milestone: Option<u32>,
}

/// Per-run mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub phase: RunPhase,
    pub score: u32,
    /// Obstacle approach speed multiplier.
    pub game_speed: f32,
    /// Sanitised time accumulated since the run started.
    pub clock: Duration,
    /// Run time of the last regular spawn wave.
    pub last_spawn: Duration,
    /// Run time of the last edge spawn.
    pub last_edge_spawn: Duration,
    pub spawn_interval: Duration,
    pub multi_spawn_count: usize,
}

impl RunState {
    pub fn new(spawn: &SpawnTuning) -> Self {
        Self {
            phase: RunPhase::NotStarted,
            score: 0,
            game_speed: 1.0,
            clock: Duration::ZERO,
            last_spawn: Duration::ZERO,
            last_edge_spawn: Duration::ZERO,
            spawn_interval: Duration::from_millis(spawn.spawn_interval_ms),
            multi_spawn_count: spawn.multi_spawn_count,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// `NotStarted → Running`. Returns false (and changes nothing) from any other phase.
    pub fn start(&mut self, spawn: &SpawnTuning) -> bool {
        if self.phase != RunPhase::NotStarted {
            return false;
        }
        *self = Self::new(spawn);
        self.phase = RunPhase::Running;
        true
    }

    /// `Running → Ended`.
    pub fn end(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::Ended;
        true
    }

    /// `Ended → NotStarted`, clearing score and difficulty.
    pub fn restart(&mut self, spawn: &SpawnTuning) -> bool {
        if self.phase != RunPhase::Ended {
            return false;
        }
        *self = Self::new(spawn);
        true
    }

    /// Advance the run clock. Ignored outside `Running`.
    pub fn advance_clock(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }
        match Duration::try_from_secs_f32(dt) {
            Ok(step) => self.clock = self.clock.saturating_add(step),
            Err(e) => log::warn!("Run clock ignored delta {}: {}", dt, e),
        }
    }

    /// Count one obstacle pass and apply any difficulty step it triggers.
    pub fn record_pass(&mut self, scoring: &ScoringTuning) -> PassOutcome {
        if !self.is_running() {
            return PassOutcome {
                score: self.score,
                ..Default::default()
            };
        }
        self.score += 1;
        let mut outcome = PassOutcome {
            score: self.score,
            ..Default::default()
        };

        if scoring.game_speed_interval > 0 && self.score % scoring.game_speed_interval == 0 {
            self.game_speed += scoring.game_speed_step;
            outcome.game_speed = Some(self.game_speed);
        }
        if scoring.cruise_milestone > 0 && self.score % scoring.cruise_milestone == 0 {
            outcome.cruise_milestone = Some(self.score / scoring.cruise_milestone);
        }
        outcome
    }
}

/// Cruise speed after reaching `milestones` milestones: base plus one step per milestone.
pub fn cruise_speed(milestones: u32, flight: &FlightTuning, scoring: &ScoringTuning) -> f32 {
    flight.base_speed + milestones as f32 * scoring.cruise_step
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> RunState {
        let spawn = SpawnTuning::default();
        let mut state = RunState::new(&spawn);
        assert!(state.start(&spawn));
        state
    }

    #[test]
    fn phases_only_follow_legal_transitions() {
        let spawn = SpawnTuning::default();
        let mut state = RunState::new(&spawn);
        assert!(!state.end());
        assert!(!state.restart(&spawn));
        assert!(state.start(&spawn));
        assert!(!state.start(&spawn));
        assert!(state.end());
        assert!(!state.start(&spawn));
        assert!(state.restart(&spawn));
        assert_eq!(state.phase, RunPhase::NotStarted);
    }

    #[test]
    fn tenth_point_raises_game_speed_once() {
        let scoring = ScoringTuning::default();
        let mut state = running();
        for _ in 0..9 {
            assert_eq!(state.record_pass(&scoring).game_speed, None);
        }
        let before = state.game_speed;
        let outcome = state.record_pass(&scoring);
        assert_eq!(outcome.score, 10);
        assert_eq!(outcome.game_speed, Some(before + 0.01));
        assert_eq!(state.record_pass(&scoring).game_speed, None);
    }

    #[test]
    fn thousandth_point_is_a_cruise_milestone() {
        let scoring = ScoringTuning::default();
        let flight = FlightTuning::default();
        let mut state = running();
        state.score = 999;
        let outcome = state.record_pass(&scoring);
        assert_eq!(outcome.cruise_milestone, Some(1));
        assert!((cruise_speed(1, &flight, &scoring) - 1.8).abs() < 1e-6);
        state.score = 1999;
        assert_eq!(state.record_pass(&scoring).cruise_milestone, Some(2));
        assert!((cruise_speed(2, &flight, &scoring) - 2.8).abs() < 1e-6);
    }

    #[test]
    fn frozen_after_end() {
        let scoring = ScoringTuning::default();
        let mut state = running();
        state.record_pass(&scoring);
        state.advance_clock(0.5);
        state.end();
        let frozen = state.clone();
        state.record_pass(&scoring);
        state.advance_clock(0.5);
        assert_eq!(state, frozen);
    }

    #[test]
    fn unrepresentable_delta_leaves_clock_alone() {
        let mut state = running();
        state.advance_clock(0.25);
        for dt in [1e30, f32::NAN, -1.0] {
            state.advance_clock(dt);
        }
        assert_eq!(state.clock, Duration::from_millis(250));
    }

    #[test]
    fn restart_resets_score_and_speed() {
        let spawn = SpawnTuning::default();
        let scoring = ScoringTuning::default();
        let mut state = running();
        for _ in 0..25 {
            state.record_pass(&scoring);
        }
        assert!(state.game_speed > 1.0);
        state.end();
        state.restart(&spawn);
        assert_eq!(state.score, 0);
        assert_eq!(state.game_speed, 1.0);
        assert_eq!(state.clock, Duration::ZERO);
    }
}
