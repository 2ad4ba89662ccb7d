//! Skydodge: an endless-dodge flight game core.
//!
//! A [`Session`] owns the whole game. The host calls [`Session::tick`] once per
//! frame with the elapsed time and that frame's [`input::FrameInput`], reacts to
//! the returned [`GameEvent`]s, and draws from [`Session::snapshot`].

pub mod autopilot;
pub mod camera;
pub mod config;
pub mod events;
pub mod flight;
pub mod hud;
pub mod obstacle;
pub mod scoring;
pub mod session;
pub mod spawner;

pub use autopilot::Autopilot;
pub use camera::ChaseCamera;
pub use config::{ConfigError, GameConfig};
pub use events::GameEvent;
pub use flight::Vehicle;
pub use hud::{GameOverSummary, HudData, RadarBlip};
pub use obstacle::{Obstacle, ObstacleId, ObstacleKind, ObstaclePool, ObstacleShape};
pub use scoring::{RunPhase, RunState};
pub use session::{FrameSnapshot, ObstacleView, Session};
pub use spawner::ObstacleSpawner;
