//! Sprite loading
//!
//! Every sprite the game draws is named by a `SpriteKey`. Textures are loaded
//! from a root directory once, before the first scene starts. A sprite that
//! fails to load is logged and drawn as a flat coloured box instead.

use std::collections::HashMap;

use macroquad::prelude::*;

/// The fixed set of sprites shipped in `sprites/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Block,
    Brick,
    Coin,
    Question,
    Unboxed,
    PipeLeft,
    PipeRight,
    PipeTopLeft,
    PipeTopRight,
    EvilShroom,
    Mushroom,
    MarioStanding,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 12] = [
        SpriteKey::Block,
        SpriteKey::Brick,
        SpriteKey::Coin,
        SpriteKey::Question,
        SpriteKey::Unboxed,
        SpriteKey::PipeLeft,
        SpriteKey::PipeRight,
        SpriteKey::PipeTopLeft,
        SpriteKey::PipeTopRight,
        SpriteKey::EvilShroom,
        SpriteKey::Mushroom,
        SpriteKey::MarioStanding,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpriteKey::Block => "block",
            SpriteKey::Brick => "brick",
            SpriteKey::Coin => "coin",
            SpriteKey::Question => "question",
            SpriteKey::Unboxed => "unboxed",
            SpriteKey::PipeLeft => "pipe-left",
            SpriteKey::PipeRight => "pipe-right",
            SpriteKey::PipeTopLeft => "pipe-top-left-side",
            SpriteKey::PipeTopRight => "pipe-top-right-side",
            SpriteKey::EvilShroom => "evil-shroom-1",
            SpriteKey::Mushroom => "mushroom",
            SpriteKey::MarioStanding => "mario-standing",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.name())
    }

    /// Native pixel size of the sprite image. Unscaled colliders use this.
    pub fn size(&self) -> Vec2 {
        match self {
            // Pipe art is drawn at double resolution and scaled down by the tile table
            SpriteKey::PipeLeft
            | SpriteKey::PipeRight
            | SpriteKey::PipeTopLeft
            | SpriteKey::PipeTopRight => vec2(40.0, 40.0),
            _ => vec2(20.0, 20.0),
        }
    }

    /// Colour used when the texture is missing.
    pub fn fallback_color(&self) -> Color {
        match self {
            SpriteKey::Block => Color::from_rgba(200, 120, 60, 255),
            SpriteKey::Brick => Color::from_rgba(170, 70, 30, 255),
            SpriteKey::Coin => GOLD,
            SpriteKey::Question => Color::from_rgba(240, 180, 40, 255),
            SpriteKey::Unboxed => Color::from_rgba(120, 80, 50, 255),
            SpriteKey::PipeLeft
            | SpriteKey::PipeRight
            | SpriteKey::PipeTopLeft
            | SpriteKey::PipeTopRight => Color::from_rgba(40, 170, 60, 255),
            SpriteKey::EvilShroom => Color::from_rgba(150, 60, 20, 255),
            SpriteKey::Mushroom => Color::from_rgba(230, 40, 40, 255),
            SpriteKey::MarioStanding => Color::from_rgba(220, 30, 30, 255),
        }
    }
}

/// Loaded textures, keyed by sprite.
pub struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// An atlas with nothing loaded; everything draws as fallback boxes.
    pub fn empty() -> Self {
        Self { textures: HashMap::new() }
    }

    /// Load every sprite from `root`. Missing files are logged, not fatal.
    pub async fn load(root: &str) -> Self {
        let mut atlas = Self::empty();

        for key in SpriteKey::ALL {
            let path = format!("{}/{}", root.trim_end_matches('/'), key.file_name());
            match load_texture(&path).await {
                Ok(texture) => {
                    texture.set_filter(FilterMode::Nearest);
                    atlas.textures.insert(key, texture);
                }
                Err(e) => log::warn!("sprite '{}' not loaded from {}: {}", key.name(), path, e),
            }
        }

        log::info!(
            "loaded {}/{} sprites from {}",
            atlas.textures.len(),
            SpriteKey::ALL.len(),
            root
        );
        atlas
    }

    pub fn get(&self, key: SpriteKey) -> Option<&Texture2D> {
        self.textures.get(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_names_are_unique() {
        let mut names: Vec<_> = SpriteKey::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SpriteKey::ALL.len());
    }

    #[test]
    fn test_pipes_scale_down_to_one_tile() {
        for key in [SpriteKey::PipeLeft, SpriteKey::PipeTopRight] {
            assert_eq!(key.size() * 0.5, vec2(20.0, 20.0));
        }
        assert_eq!(SpriteKey::Brick.size(), vec2(20.0, 20.0));
        assert_eq!(SpriteKey::EvilShroom.file_name(), "evil-shroom-1.png");
    }
}
