//! Game configuration (flight, spawning, scoring, camera tuning). Loaded from config.ron at startup.

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from strict config loading. [`GameConfig::load`] never returns these;
/// it logs them and falls back to defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Vehicle handling. Speeds are in "cruise units"; the move multiplier turns
/// them into world units per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Cruise speed at run start.
    pub base_speed: f32,
    /// Radians added per tick for a full control request at base speed.
    pub base_sensitivity: f32,
    /// Extra sensitivity per unit of speed above base.
    pub sensitivity_gain: f32,
    /// Per-tick auto-level factor at base speed.
    pub auto_level: f32,
    /// Auto-level reduction per unit of speed above base.
    pub auto_level_gain: f32,
    /// Auto-level never drops below this.
    pub min_auto_level: f32,
    /// Orientation limit on every axis (radians).
    pub max_angle: f32,
    /// World units per second per unit of speed at base speed.
    pub base_move_multiplier: f32,
    /// Extra move multiplier per unit of speed above base.
    pub move_multiplier_gain: f32,
    /// Height of the sea plane.
    pub sea_level: f32,
    /// Minimum height above the sea plane.
    pub clearance: f32,
    /// Half extents of the vehicle collision box (wingspan, height, length).
    pub half_extents: Vec3,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            base_speed: 0.8,
            base_sensitivity: 0.035,
            sensitivity_gain: 0.020,
            auto_level: 0.92,
            auto_level_gain: 0.02,
            min_auto_level: 0.88,
            max_angle: std::f32::consts::FRAC_PI_3,
            base_move_multiplier: 80.0,
            move_multiplier_gain: 60.0,
            sea_level: -20.0,
            clearance: 8.0,
            half_extents: Vec3::new(4.25, 1.25, 3.75),
        }
    }
}

impl FlightTuning {
    /// Lowest height the vehicle may occupy.
    pub fn floor(&self) -> f32 {
        self.sea_level + self.clearance
    }
}

/// Obstacle pool and spawn scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Obstacles placed before the first tick of a run.
    pub prepopulate_count: usize,
    /// Pool ceiling; spawns beyond it are skipped.
    pub max_obstacles: usize,
    /// No obstacle updates until this long after run start.
    pub start_delay_ms: u64,
    /// Time between regular spawn waves.
    pub spawn_interval_ms: u64,
    /// Obstacles per regular wave.
    pub multi_spawn_count: usize,
    /// Edge spawns fire every `spawn_interval * edge_interval_factor`.
    pub edge_interval_factor: f32,
    /// Minimum distance ahead of the vehicle for new obstacles.
    pub base_distance: f32,
    /// Random extra distance on top of `base_distance`.
    pub distance_jitter: f32,
    /// Full width (x) and height (y) of the regular placement window.
    pub spread: Vec2,
    /// Lateral (x) and vertical (y) offset of the edge bands.
    pub edge_offset: Vec2,
    /// Full width of the edge band along its free axis.
    pub edge_spread: f32,
    /// Obstacle approach speed in world units per second at game speed 1.0.
    pub advance_rate: f32,
    /// Obstacles this far behind the vehicle are recycled.
    pub trailing_distance: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            prepopulate_count: 15,
            max_obstacles: 512,
            start_delay_ms: 1000,
            spawn_interval_ms: 1500,
            multi_spawn_count: 2,
            edge_interval_factor: 1.2,
            base_distance: 300.0,
            distance_jitter: 100.0,
            spread: Vec2::new(80.0, 60.0),
            edge_offset: Vec2::new(35.0, 25.0),
            edge_spread: 20.0,
            advance_rate: 72.0,
            trailing_distance: 20.0,
        }
    }
}

/// Score-driven difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Game speed rises every time the score reaches a multiple of this.
    pub game_speed_interval: u32,
    pub game_speed_step: f32,
    /// Cruise speed rises every time the score reaches a multiple of this.
    pub cruise_milestone: u32,
    /// Cruise speed added per milestone reached.
    pub cruise_step: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            game_speed_interval: 10,
            game_speed_step: 0.01,
            cruise_milestone: 1000,
            cruise_step: 1.0,
        }
    }
}

/// Chase camera placement and smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Vehicle yaw seen by the camera is clamped to this (radians).
    pub max_yaw_influence: f32,
    /// Sideways shift per unit of sin(yaw).
    pub lateral_offset: f32,
    pub height: f32,
    pub distance_behind: f32,
    /// Fraction of the remaining gap closed each tick.
    pub smoothing: f32,
    pub look_lateral: f32,
    pub look_height: f32,
    pub look_ahead: f32,
    /// Pose used before the first run and after restart.
    pub rest_position: Vec3,
    pub rest_look_at: Vec3,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            max_yaw_influence: std::f32::consts::PI / 18.0,
            lateral_offset: 8.0,
            height: 12.0,
            distance_behind: 20.0,
            smoothing: 0.08,
            look_lateral: 5.0,
            look_height: 2.0,
            look_ahead: 30.0,
            rest_position: Vec3::new(0.0, 8.0, 15.0),
            rest_look_at: Vec3::new(0.0, 0.0, -30.0),
        }
    }
}

/// Headless demo driver settings (the `skydodge` binary).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Simulated seconds to run in total.
    pub duration_secs: f32,
    /// Fixed tick rate for the simulated frame loop.
    pub tick_rate: f32,
    /// Stop after this many crashes.
    pub max_runs: u32,
    /// Pace ticks against the wall clock and feed measured frame times
    /// instead of a fixed step.
    pub realtime: bool,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            duration_secs: 120.0,
            tick_rate: 60.0,
            max_runs: 3,
            realtime: false,
        }
    }
}

/// Game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub flight: FlightTuning,
    #[serde(default)]
    pub spawn: SpawnTuning,
    #[serde(default)]
    pub scoring: ScoringTuning,
    #[serde(default)]
    pub camera: CameraTuning,
    /// Radar shows obstacles closer than this (XZ plane).
    #[serde(default = "default_radar_radius")]
    pub radar_radius: f32,
    /// Longest frame delta integrated in one tick (seconds).
    #[serde(default = "default_max_frame_delta")]
    pub max_frame_delta: f32,
    /// Fixed RNG seed. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub demo: DemoSettings,
}

/// Largest accepted `max_frame_delta` (seconds).
const MAX_FRAME_DELTA_CEILING: f32 = 1.0;
const MAX_EDGE_INTERVAL_FACTOR: f32 = 100.0;
const MAX_SPAWN_INTERVAL_MS: u64 = 60_000;

fn default_radar_radius() -> f32 {
    100.0
}
fn default_max_frame_delta() -> f32 {
    engine_core::DEFAULT_MAX_DELTA
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            flight: FlightTuning::default(),
            spawn: SpawnTuning::default(),
            scoring: ScoringTuning::default(),
            camera: CameraTuning::default(),
            radar_radius: default_radar_radius(),
            max_frame_delta: default_max_frame_delta(),
            seed: None,
            demo: DemoSettings::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&data).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_ron(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.flight;
        let s = &self.spawn;
        let checks = [
            (f.base_speed > 0.0, "flight.base_speed must be positive"),
            (
                f.max_angle > 0.0 && f.max_angle < std::f32::consts::PI,
                "flight.max_angle must be in (0, pi)",
            ),
            (
                f.min_auto_level > 0.0 && f.auto_level <= 1.0,
                "flight auto-level factors must be in (0, 1]",
            ),
            (
                s.spawn_interval_ms > 0 && s.spawn_interval_ms <= MAX_SPAWN_INTERVAL_MS,
                "spawn.spawn_interval_ms must be in (0, 60000]",
            ),
            (s.multi_spawn_count > 0, "spawn.multi_spawn_count must be at least 1"),
            (
                s.max_obstacles >= s.prepopulate_count,
                "spawn.max_obstacles must cover spawn.prepopulate_count",
            ),
            (
                s.edge_interval_factor > 0.0 && s.edge_interval_factor <= MAX_EDGE_INTERVAL_FACTOR,
                "spawn.edge_interval_factor must be in (0, 100]",
            ),
            (
                self.camera.smoothing > 0.0 && self.camera.smoothing <= 1.0,
                "camera.smoothing must be in (0, 1]",
            ),
            (
                self.max_frame_delta > 0.0 && self.max_frame_delta <= MAX_FRAME_DELTA_CEILING,
                "max_frame_delta must be in (0, 1] seconds",
            ),
            (self.radar_radius > 0.0, "radar_radius must be positive"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, msg)) => Err(ConfigError::Invalid((*msg).to_string())),
            None => Ok(()),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(GameConfig::default().flight.floor(), -12.0);
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let config = GameConfig::from_ron("(seed: Some(7), spawn: (multi_spawn_count: 3))").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.spawn.multi_spawn_count, 3);
        assert_eq!(config.spawn.spawn_interval_ms, 1500);
        assert_eq!(config.radar_radius, 100.0);
    }

    #[test]
    fn rejects_zero_interval() {
        let err = GameConfig::from_ron("(spawn: (spawn_interval_ms: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_oversized_delta() {
        let err = GameConfig::from_ron("(max_frame_delta: 1e30)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(GameConfig::from_ron("(max_frame_delta: 1.0)").is_ok());
    }

    #[test]
    fn rejects_oversized_edge_factor() {
        for text in [
            "(spawn: (edge_interval_factor: 1e30))",
            "(spawn: (edge_interval_factor: inf))",
            "(spawn: (spawn_interval_ms: 18446744073709551615))",
        ] {
            assert!(matches!(
                GameConfig::from_ron(text),
                Err(ConfigError::Invalid(_)) | Err(ConfigError::Parse { .. })
            ));
        }
    }

    #[test]
    fn rejects_malformed_text() {
        let err = GameConfig::from_ron("(flight: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load_from(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
