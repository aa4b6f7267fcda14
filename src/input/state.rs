//! Input state management
//!
//! Polls keyboard and mouse from macroquad once per frame into a
//! `FrameInput` snapshot. The rest of the viewer only sees the snapshot,
//! which keeps the update logic testable without a window.

use macroquad::prelude::*;
use super::Action;

/// Everything the viewer needs to know about input for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    held: [bool; Action::COUNT],
    pressed: [bool; Action::COUNT],
    /// Mouse position in screen pixels
    pub mouse_position: Vec2,
    /// Mouse motion since the previous frame, in pixels
    pub mouse_delta: Vec2,
    /// Left button went down this frame
    pub left_pressed: bool,
    /// Seconds since the previous frame
    pub frame_time: f32,
}

impl FrameInput {
    /// Empty snapshot for a frame of the given length
    pub fn idle(frame_time: f32) -> Self {
        Self {
            frame_time,
            ..Default::default()
        }
    }

    /// Check if action is currently held down
    pub fn down(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Check if action was just pressed this frame
    pub fn pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }

    pub fn set_down(&mut self, action: Action, down: bool) {
        self.held[action.index()] = down;
    }

    pub fn set_pressed(&mut self, action: Action, pressed: bool) {
        self.pressed[action.index()] = pressed;
    }
}

#[cfg(test)]
impl FrameInput {
    pub fn with_down(mut self, action: Action) -> Self {
        self.set_down(action, true);
        self
    }

    /// Mark as pressed this frame (a press is also a hold)
    pub fn with_pressed(mut self, action: Action) -> Self {
        self.set_pressed(action, true);
        self.set_down(action, true);
        self
    }

    pub fn with_mouse_delta(mut self, delta: Vec2) -> Self {
        self.mouse_delta = delta;
        self
    }

    pub fn with_click(mut self, position: Vec2) -> Self {
        self.mouse_position = position;
        self.left_pressed = true;
        self
    }
}

/// Per-frame poller; remembers the last mouse position to derive deltas
pub struct InputState {
    last_mouse: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self { last_mouse: None }
    }

    /// Call once per frame before updating the viewer
    pub fn poll(&mut self) -> FrameInput {
        let mut frame = FrameInput::idle(get_frame_time());

        for action in Action::ALL {
            let key = action.key();
            frame.set_down(action, is_key_down(key));
            frame.set_pressed(action, is_key_pressed(key));
        }

        let mouse = Vec2::from(mouse_position());
        frame.mouse_delta = self.mouse_delta(mouse);
        frame.mouse_position = mouse;
        frame.left_pressed = is_mouse_button_pressed(MouseButton::Left);
        frame
    }

    /// Forget the last mouse position so the next poll reports no motion.
    ///
    /// Grabbing or releasing the cursor makes the reported position jump.
    pub fn reset_mouse(&mut self) {
        self.last_mouse = None;
    }

    fn mouse_delta(&mut self, mouse: Vec2) -> Vec2 {
        let delta = self.last_mouse.map_or(Vec2::ZERO, |last| mouse - last);
        self.last_mouse = Some(mouse);
        delta
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_delta_is_zero() {
        let mut input = InputState::new();
        assert_eq!(input.mouse_delta(vec2(300.0, 200.0)), Vec2::ZERO);
        assert_eq!(input.mouse_delta(vec2(305.0, 197.0)), vec2(5.0, -3.0));
    }

    #[test]
    fn test_reset_mouse_swallows_jump() {
        let mut input = InputState::new();
        input.mouse_delta(vec2(10.0, 10.0));
        input.reset_mouse();
        assert_eq!(input.mouse_delta(vec2(400.0, 225.0)), Vec2::ZERO);
    }

    #[test]
    fn test_pressed_implies_down() {
        let frame = FrameInput::idle(0.016).with_pressed(Action::ResetCamera);
        assert!(frame.pressed(Action::ResetCamera));
        assert!(frame.down(Action::ResetCamera));
        assert!(!frame.down(Action::MoveForward));
        assert!(!frame.pressed(Action::MoveForward));
    }
}
