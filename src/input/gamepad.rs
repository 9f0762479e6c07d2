//! Gamepad support
//!
//! Native: first connected pad through gilrs.
//! WASM: no gamepad; every query reports released.

use macroquad::prelude::Vec2;

/// Button bit indices (standard Xbox-style layout)
pub mod button {
    pub const SOUTH: u32 = 0;
    pub const START: u32 = 9;
    pub const DPAD_LEFT: u32 = 14;
    pub const DPAD_RIGHT: u32 = 15;
}

// ============================================================================
// WASM
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod platform {
    use super::*;

    pub struct Gamepad;

    impl Gamepad {
        pub fn new() -> Self {
            Self
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn is_button_down(&self, _button: u32) -> bool {
            false
        }

        pub fn is_button_pressed(&self, _button: u32) -> bool {
            false
        }

        pub fn left_stick(&self) -> Vec2 {
            Vec2::ZERO
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

// ============================================================================
// Native (gilrs)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use super::*;
    use gilrs::{Axis, Button as GilrsButton, Gilrs};

    const BUTTONS: [(GilrsButton, u32); 4] = [
        (GilrsButton::South, button::SOUTH),
        (GilrsButton::Start, button::START),
        (GilrsButton::DPadLeft, button::DPAD_LEFT),
        (GilrsButton::DPadRight, button::DPAD_RIGHT),
    ];

    pub struct Gamepad {
        /// None when the platform backend failed to start
        gilrs: Option<Gilrs>,
        deadzone: f32,
        buttons: u32,
        last_buttons: u32,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(e) => {
                    log::warn!("gamepad support disabled: {}", e);
                    None
                }
            };
            Self { gilrs, deadzone: 0.15, buttons: 0, last_buttons: 0 }
        }

        /// Pump gilrs events and latch this frame's button mask.
        pub fn poll(&mut self) {
            let Some(gilrs) = self.gilrs.as_mut() else { return };
            while gilrs.next_event().is_some() {}

            self.last_buttons = self.buttons;
            self.buttons = self.button_mask();
        }

        fn active(&self) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().next().map(|(_, gp)| gp)
        }

        pub fn has_gamepad(&self) -> bool {
            self.active().is_some()
        }

        fn button_mask(&self) -> u32 {
            let Some(gp) = self.active() else { return 0 };
            BUTTONS
                .iter()
                .filter(|(b, _)| gp.is_pressed(*b))
                .fold(0u32, |mask, (_, bit)| mask | (1u32 << *bit))
        }

        pub fn is_button_down(&self, button: u32) -> bool {
            self.buttons & (1 << button) != 0
        }

        /// Went down since the previous poll.
        pub fn is_button_pressed(&self, button: u32) -> bool {
            let bit = 1 << button;
            self.buttons & bit != 0 && self.last_buttons & bit == 0
        }

        pub fn left_stick(&self) -> Vec2 {
            let Some(gp) = self.active() else { return Vec2::ZERO };
            let x = gp.value(Axis::LeftStickX);
            let y = -gp.value(Axis::LeftStickY);
            apply_deadzone(x, y, self.deadzone)
        }
    }

    impl Default for Gamepad {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Radial deadzone with linear rescaling
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn apply_deadzone(x: f32, y: f32, deadzone: f32) -> Vec2 {
    let len = (x * x + y * y).sqrt();
    if len < deadzone {
        return Vec2::ZERO;
    }
    let scale = (len - deadzone) / (1.0 - deadzone) / len;
    Vec2::new(x * scale, y * scale)
}

pub use platform::Gamepad;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_swallows_drift() {
        assert_eq!(apply_deadzone(0.1, 0.05, 0.15), Vec2::ZERO);
    }

    #[test]
    fn test_deadzone_rescales_to_full_range() {
        let full = apply_deadzone(1.0, 0.0, 0.15);
        assert!((full.x - 1.0).abs() < 1e-6);
        let half = apply_deadzone(0.575, 0.0, 0.15);
        assert!((half.x - 0.5).abs() < 1e-3);
    }
}
