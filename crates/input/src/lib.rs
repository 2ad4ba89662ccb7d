//! Input handling: keyboard state and the normalized flight control vector.

use std::collections::HashSet;

/// Normalized flight controls. Each axis is a request in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    /// Nose down is negative.
    pub pitch: f32,
    /// Turn left is positive.
    pub yaw: f32,
    pub roll: f32,
}

impl ControlInput {
    pub const NONE: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Replace non-finite components with zero and clamp the rest to `[-1, 1]`.
    pub fn sanitized(&self) -> Self {
        fn axis(v: f32) -> f32 {
            if v.is_finite() {
                v.clamp(-1.0, 1.0)
            } else {
                0.0
            }
        }
        Self {
            pitch: axis(self.pitch),
            yaw: axis(self.yaw),
            roll: axis(self.roll),
        }
    }

    /// True when no axis is requested.
    pub fn is_idle(&self) -> bool {
        let s = self.sanitized();
        s.pitch == 0.0 && s.yaw == 0.0 && s.roll == 0.0
    }
}

/// Everything the simulation reads from the outside world for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub control: ControlInput,
    /// Start the run (start button, or any key while idle).
    pub start_requested: bool,
    /// Return to the start screen after a crash.
    pub restart_requested: bool,
}

impl FrameInput {
    pub fn control(control: ControlInput) -> Self {
        Self {
            control,
            ..Default::default()
        }
    }

    pub fn start() -> Self {
        Self {
            start_requested: true,
            ..Default::default()
        }
    }

    pub fn restart() -> Self {
        Self {
            restart_requested: true,
            ..Default::default()
        }
    }
}

/// Manages keyboard state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Drop every held key. Call when the window loses focus so nothing sticks.
    pub fn clear(&mut self) {
        if !self.keys_held.is_empty() {
            log::debug!("Focus lost, releasing {} held keys", self.keys_held.len());
        }
        self.keys_held.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Any fresh key press this frame (starts the game from the idle screen).
    pub fn any_key_pressed(&self) -> bool {
        !self.keys_pressed.is_empty()
    }

    /// Map held keys to the flight control vector.
    ///
    /// W/Up dives, S/Down climbs, A/Left and D/Right turn, Q/E roll. When both
    /// keys of an axis are held, S, D and E win.
    pub fn control_input(&self) -> ControlInput {
        let mut control = ControlInput::NONE;

        if self.is_key_held(KeyCode::KeyW) || self.is_key_held(KeyCode::ArrowUp) {
            control.pitch = -1.0;
        }
        if self.is_key_held(KeyCode::KeyS) || self.is_key_held(KeyCode::ArrowDown) {
            control.pitch = 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) || self.is_key_held(KeyCode::ArrowLeft) {
            control.yaw = 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) || self.is_key_held(KeyCode::ArrowRight) {
            control.yaw = -1.0;
        }
        if self.is_key_held(KeyCode::KeyQ) {
            control.roll = 1.0;
        }
        if self.is_key_held(KeyCode::KeyE) {
            control.roll = -1.0;
        }

        control
    }

    /// Build the tick input from key state. `start_button`/`restart_button`
    /// are UI buttons owned by the host.
    pub fn frame_input(&self, start_button: bool, restart_button: bool) -> FrameInput {
        FrameInput {
            control: self.control_input(),
            start_requested: start_button || self.any_key_pressed(),
            restart_requested: restart_button,
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_map_to_axes() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyE, ElementState::Pressed);
        assert_eq!(input.control_input(), ControlInput::new(-1.0, 1.0, -1.0));
    }

    #[test]
    fn opposing_keys_resolve_to_later_rule() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed);
        input.process_keyboard(KeyCode::ArrowDown, ElementState::Pressed);
        assert_eq!(input.control_input().pitch, 1.0);
    }

    #[test]
    fn press_is_reported_once() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(input.any_key_pressed());
        input.begin_frame();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(!input.any_key_pressed());
        assert!(input.is_key_held(KeyCode::Space));
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        input.clear();
        assert!(input.control_input().is_idle());
        assert!(!input.frame_input(false, false).start_requested);
    }

    #[test]
    fn sanitized_drops_nan_and_clamps() {
        let c = ControlInput::new(f32::NAN, 3.0, -0.5).sanitized();
        assert_eq!(c, ControlInput::new(0.0, 1.0, -0.5));
        assert!(ControlInput::new(f32::NAN, 0.0, 0.0).is_idle());
    }
}
