//! Input handling
//!
//! Keyboard (macroquad) and, on native builds, the first connected gamepad
//! (gilrs) are merged into one `FrameInput` snapshot per frame. Gameplay code
//! only ever sees the snapshot, so it runs the same in tests.

mod actions;
mod gamepad;
mod state;

pub use actions::*;
pub use gamepad::{button, Gamepad};
pub use state::*;
