//! Input handling
//!
//! Action-based keyboard/mouse input. `InputState` polls macroquad,
//! everything downstream works on the `FrameInput` snapshot.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
