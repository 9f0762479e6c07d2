//! Input state management
//!
//! Polls keyboard (macroquad) and gamepad once per frame and folds both into
//! a `FrameInput`.

use macroquad::prelude::*;

use super::{button, Action, FrameInput, Gamepad};

/// Stick deflection that counts as a held direction.
const STICK_THRESHOLD: f32 = 0.5;

pub struct InputState {
    gamepad: Gamepad,
}

impl InputState {
    pub fn new() -> Self {
        Self { gamepad: Gamepad::new() }
    }

    /// Call once per frame before `snapshot`.
    pub fn poll(&mut self) {
        self.gamepad.poll();
    }

    pub fn snapshot(&self) -> FrameInput {
        FrameInput {
            left: self.action_down(Action::MoveLeft),
            right: self.action_down(Action::MoveRight),
            jump: self.action_pressed(Action::Jump),
            restart: self.action_pressed(Action::Restart),
        }
    }

    pub fn action_down(&self, action: Action) -> bool {
        self.keyboard_down(action) || self.gamepad_down(action)
    }

    pub fn action_pressed(&self, action: Action) -> bool {
        self.keyboard_pressed(action) || self.gamepad_pressed(action)
    }

    fn keyboard_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            Action::MoveRight => is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            Action::Jump => {
                is_key_down(KeyCode::Space) || is_key_down(KeyCode::Up) || is_key_down(KeyCode::W)
            }
            Action::Restart => is_key_down(KeyCode::R),
        }
    }

    fn keyboard_pressed(&self, action: Action) -> bool {
        match action {
            Action::Jump => {
                is_key_pressed(KeyCode::Space)
                    || is_key_pressed(KeyCode::Up)
                    || is_key_pressed(KeyCode::W)
            }
            Action::Restart => is_key_pressed(KeyCode::R),
            Action::MoveLeft => is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A),
            Action::MoveRight => is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D),
        }
    }

    fn gamepad_down(&self, action: Action) -> bool {
        let stick = self.gamepad.left_stick();
        match action {
            Action::MoveLeft => {
                self.gamepad.is_button_down(button::DPAD_LEFT) || stick.x < -STICK_THRESHOLD
            }
            Action::MoveRight => {
                self.gamepad.is_button_down(button::DPAD_RIGHT) || stick.x > STICK_THRESHOLD
            }
            Action::Jump => self.gamepad.is_button_down(button::SOUTH),
            Action::Restart => self.gamepad.is_button_down(button::START),
        }
    }

    fn gamepad_pressed(&self, action: Action) -> bool {
        match action {
            Action::Jump => self.gamepad.is_button_pressed(button::SOUTH),
            Action::Restart => self.gamepad.is_button_pressed(button::START),
            Action::MoveLeft => self.gamepad.is_button_pressed(button::DPAD_LEFT),
            Action::MoveRight => self.gamepad.is_button_pressed(button::DPAD_RIGHT),
        }
    }

    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
