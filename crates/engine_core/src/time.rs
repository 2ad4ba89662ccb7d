//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Largest frame delta fed to the simulation by default (seconds).
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Sanitise a raw frame delta in seconds.
///
/// Returns `None` for NaN, infinite, zero or negative input (the step should be
/// skipped) and clamps anything above `max` down to `max`.
pub fn sanitize_delta(raw: f32, max: f32) -> Option<f32> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    Some(raw.min(max))
}

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time when the clock started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Raw duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Upper bound applied to the delta handed to the simulation.
    max_delta: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Create a time manager with a custom delta ceiling (seconds).
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            max_delta,
            ..Self::new()
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;
        if self.delta.as_secs_f32() > self.max_delta {
            log::debug!(
                "Long frame ({:.3}s), clamping to {:.3}s",
                self.delta.as_secs_f32(),
                self.max_delta
            );
        }
    }

    /// Get the sanitised delta time in seconds (0.0 when the frame should not step).
    pub fn delta_seconds(&self) -> f32 {
        sanitize_delta(self.delta.as_secs_f32(), self.max_delta).unwrap_or(0.0)
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rejects_non_positive_and_nan() {
        assert_eq!(sanitize_delta(0.0, 0.1), None);
        assert_eq!(sanitize_delta(-0.016, 0.1), None);
        assert_eq!(sanitize_delta(f32::NAN, 0.1), None);
        assert_eq!(sanitize_delta(f32::INFINITY, 0.1), None);
    }

    #[test]
    fn sanitize_clamps_long_frames() {
        assert_eq!(sanitize_delta(2.5, 0.1), Some(0.1));
        assert_eq!(sanitize_delta(0.016, 0.1), Some(0.016));
    }

    #[test]
    fn fresh_clock_reports_zero_delta() {
        let time = Time::with_max_delta(0.05);
        assert_eq!(time.delta_seconds(), 0.0);
        assert_eq!(time.frame_count(), 0);
    }
}
