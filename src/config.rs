//! Game tuning
//!
//! Every gameplay constant lives in `GameConfig`. The defaults reproduce the
//! stock demo; a RON file can override any subset of fields:
//!
//! ```ron
//! (move_speed: 150.0, jump_force: 700.0)
//! ```

use std::fs;
use std::path::Path;

use macroquad::prelude::{vec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "mario.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid cell size in pixels
    pub tile_width: f32,
    pub tile_height: f32,
    /// Downward acceleration, px/s²
    pub gravity: f32,
    /// Player walk speed, px/s
    pub move_speed: f32,
    /// Upward speed applied on jump, px/s
    pub jump_force: f32,
    /// Shroom speed as a fraction of `move_speed`
    pub enemy_speed_factor: f32,
    /// Power-up speed as a fraction of `move_speed`
    pub mushroom_speed_factor: f32,
    /// Falling to this y ends the game
    pub fall_death: f32,
    /// Scale easing rate for grow/shrink
    pub grow_rate: f32,
    /// Points per coin or stomp
    pub score_step: u32,
    /// How far outside the view a spawned mushroom survives
    pub offscreen_distance: f32,
    /// Where the player appears
    pub player_spawn: (f32, f32),
    /// HUD font size
    pub hud_text_size: f32,
    /// Directory sprites are loaded from
    pub sprite_root: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_width: 20.0,
            tile_height: 20.0,
            gravity: 2000.0,
            move_speed: 120.0,
            jump_force: 640.0,
            enemy_speed_factor: 0.5,
            mushroom_speed_factor: 0.75,
            fall_death: 600.0,
            grow_rate: 6.0,
            score_step: 10,
            offscreen_distance: 200.0,
            player_spawn: (30.0, 0.0),
            hud_text_size: 14.0,
            sprite_root: "sprites".to_string(),
        }
    }
}

impl GameConfig {
    pub fn enemy_speed(&self) -> f32 {
        self.move_speed * self.enemy_speed_factor
    }

    pub fn mushroom_speed(&self) -> f32 {
        self.move_speed * self.mushroom_speed_factor
    }

    pub fn tile_size(&self) -> Vec2 {
        vec2(self.tile_width, self.tile_height)
    }

    pub fn spawn_point(&self) -> Vec2 {
        vec2(self.player_spawn.0, self.player_spawn.1)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Explicit path if given, else `mario.ron` if present, else defaults.
    /// Only an explicitly requested file is an error when missing.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::info!("loading config from {}", path.display());
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            log::info!("loading config from {}", fallback.display());
            Self::load(fallback)
        } else {
            Ok(Self::default())
        }
    }
}
