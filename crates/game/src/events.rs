//! State-change notifications emitted by a tick for the presentation layer.

use crate::hud::GameOverSummary;
use crate::obstacle::ObstacleId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// `NotStarted → Running`.
    RunStarted,
    /// An obstacle slipped past the vehicle and was counted.
    ObstacleScored { id: ObstacleId, score: u32 },
    /// Obstacles now approach faster.
    GameSpeedIncreased { game_speed: f32 },
    /// The vehicle's cruise speed jumped at a score milestone.
    CruiseSpeedIncreased { milestone: u32, speed: f32 },
    /// The vehicle hit an obstacle. Always followed by `RunEnded`.
    Collision { id: ObstacleId },
    /// `Running → Ended`.
    RunEnded(GameOverSummary),
    /// `Ended → NotStarted`.
    RunReset,
}
