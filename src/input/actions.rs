//! Viewer action definitions
//!
//! Keyboard layout follows the usual free-fly convention: WASD to move,
//! Q/E to rise and sink, plus a few viewer-specific keys.

use macroquad::prelude::KeyCode;

/// All actions the viewer responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Camera movement (held)
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    FlyUp,          // Q - world +Y
    FlyDown,        // E - world -Y

    // Camera
    ResetCamera,    // R

    // Model rotation (held), one key per axis
    RotateModelX,   // Z
    RotateModelY,   // X
    RotateModelZ,   // C

    // System
    ToggleCursor,   // Tab - release the cursor for picking
    Quit,           // Escape
}

impl Action {
    pub const COUNT: usize = 12;

    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::FlyUp,
        Action::FlyDown,
        Action::ResetCamera,
        Action::RotateModelX,
        Action::RotateModelY,
        Action::RotateModelZ,
        Action::ToggleCursor,
        Action::Quit,
    ];

    /// Keyboard binding
    pub fn key(self) -> KeyCode {
        match self {
            Action::MoveForward => KeyCode::W,
            Action::MoveBackward => KeyCode::S,
            Action::MoveLeft => KeyCode::A,
            Action::MoveRight => KeyCode::D,
            Action::FlyUp => KeyCode::Q,
            Action::FlyDown => KeyCode::E,
            Action::ResetCamera => KeyCode::R,
            Action::RotateModelX => KeyCode::Z,
            Action::RotateModelY => KeyCode::X,
            Action::RotateModelZ => KeyCode::C,
            Action::ToggleCursor => KeyCode::Tab,
            Action::Quit => KeyCode::Escape,
        }
    }

    pub(super) fn index(self) -> usize {
        self as usize
    }
}
