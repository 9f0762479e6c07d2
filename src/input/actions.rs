//! Game actions and the per-frame input snapshot

/// Everything the player can ask for.
///
/// Keyboard: Left/Right or A/D walk, Space/Up/W jump, R restarts.
/// Gamepad: D-pad or left stick walk, South (A/Cross) jumps, Start restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Restart,
}

/// Input state for one frame.
///
/// Movement is level-triggered (held), jump and restart are edge-triggered
/// (pressed this frame).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub restart: bool,
}

impl FrameInput {
    /// -1, 0 or 1. Holding both directions cancels out.
    pub fn horizontal(&self) -> f32 {
        let mut dir = 0.0;
        if self.left {
            dir -= 1.0;
        }
        if self.right {
            dir += 1.0;
        }
        dir
    }

    pub fn restart() -> Self {
        Self { restart: true, ..Self::default() }
    }
}
