//! Skydodge headless demo: an autopilot flies the game loop at a fixed step or paced by the wall clock.

use std::time::Duration;

use anyhow::{ensure, Result};
use engine_core::Time;
use game::{Autopilot, GameConfig, GameEvent, RunPhase, Session};
use input::{ElementState, InputState, KeyCode};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║                  SKYDODGE                    ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  W/S, Up/Down  - Dive / climb                ║");
    println!("║  A/D, Left/Right - Turn                      ║");
    println!("║  Q/E           - Roll                        ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Headless demo: the autopilot is flying.     ║");
    println!("║  RUST_LOG=debug for per-wave detail.         ║");
    println!("╚══════════════════════════════════════════════╝");

    let config = GameConfig::load();
    let demo = config.demo.clone();
    ensure!(
        (1.0..=1000.0).contains(&demo.tick_rate),
        "demo.tick_rate must be between 1 and 1000 Hz"
    );
    ensure!(demo.duration_secs >= 0.0, "demo.duration_secs must not be negative");

    let step = 1.0 / demo.tick_rate;
    let period = Duration::try_from_secs_f32(step)?;
    let status_every = (demo.tick_rate * 5.0).round().max(1.0) as u64;
    let game_over_ticks = demo.tick_rate.round() as u32;
    let floor = config.flight.floor();

    log::info!(
        "Starting Skydodge demo: {:.0}s at {:.0} Hz ({}), up to {} runs",
        demo.duration_secs,
        demo.tick_rate,
        if demo.realtime { "realtime" } else { "fixed step" },
        demo.max_runs
    );

    let mut session = Session::new(config);
    let mut input = InputState::new();
    let mut pilot = Autopilot::new();
    let mut clock = Time::with_max_delta(session.config().max_frame_delta);
    let mut simulated = 0.0f32;
    let mut runs = 0u32;
    let mut best = 0u32;
    let mut ended_for = 0u32;

    'frames: while simulated < demo.duration_secs {
        let dt = if demo.realtime {
            std::thread::sleep(period);
            clock.update();
            clock.delta_seconds()
        } else {
            clock.update();
            step
        };
        simulated += dt;

        input.begin_frame();
        let mut restart = false;
        match session.phase() {
            RunPhase::NotStarted => {
                input.process_keyboard(KeyCode::Space, ElementState::Pressed);
                input.process_keyboard(KeyCode::Space, ElementState::Released);
            }
            RunPhase::Running => {
                pilot.drive(session.vehicle(), session.obstacles(), floor, &mut input);
            }
            RunPhase::Ended => {
                pilot.release(&mut input);
                // Sit on the game-over screen for a second.
                ended_for += 1;
                restart = ended_for >= game_over_ticks;
            }
        }

        let frame = input.frame_input(false, restart);
        for event in session.tick(dt, &frame) {
            match event {
                GameEvent::RunStarted => log::info!("Run {} started", runs + 1),
                GameEvent::ObstacleScored { id, score } => {
                    log::trace!("Passed obstacle {} (score {})", id.0, score)
                }
                GameEvent::GameSpeedIncreased { game_speed } => {
                    log::debug!("Obstacles approaching faster: x{:.2}", game_speed)
                }
                GameEvent::CruiseSpeedIncreased { milestone, speed } => {
                    log::info!("Milestone {}: cruise speed {:.2}", milestone, speed)
                }
                GameEvent::Collision { id } => log::debug!("Collision with obstacle {}", id.0),
                GameEvent::RunEnded(summary) => {
                    runs += 1;
                    best = best.max(summary.final_score);
                    ended_for = 0;
                    log::info!(
                        "GAME OVER - score {}, distance {}, avoided {}, max speed {}",
                        summary.final_score,
                        summary.distance,
                        summary.obstacles_avoided,
                        summary.max_speed
                    );
                    if runs >= demo.max_runs {
                        break 'frames;
                    }
                }
                GameEvent::RunReset => log::info!("Back to the start screen"),
            }
        }

        if clock.frame_count() % status_every == 0 {
            log::info!("{}", session.hud().status_line());
        }
    }

    if let Some(summary) = session.game_over() {
        log::info!("Final run: {:?}", summary);
    } else {
        log::info!("Demo time up: {}", session.hud().status_line());
    }
    log::info!(
        "{} runs finished, best score {}, {} obstacles in the field ({:.2}s wall time)",
        runs,
        best,
        session.obstacles().len(),
        clock.elapsed_seconds()
    );

    Ok(())
}
