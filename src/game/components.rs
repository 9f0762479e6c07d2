//! Game Components
//!
//! Plain data attached to entities. Behaviour with state of its own (patrol,
//! grow) lives in `behaviors`; everything here is read and written by the
//! systems in `collision`, `player` and `runtime`.

use macroquad::prelude::Vec2;

use crate::assets::SpriteKey;

// =============================================================================
// Spatial
// =============================================================================

/// Top-left anchored position plus uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub pos: Vec2,
    pub scale: f32,
}

impl Transform {
    pub fn at(pos: Vec2) -> Self {
        Self { pos, scale: 1.0 }
    }
}

/// Collision rectangle, unscaled. The effective collider is `size * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves, other bodies are pushed out of it
    Static,
    /// Falls under gravity and gets resolved against static bodies
    Dynamic,
}

/// Physics body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub kind: BodyKind,
    /// Vertical speed in px/s, positive is down
    pub vel_y: f32,
    /// Resting on a static body since the last physics step
    pub grounded: bool,
    /// Horizontal displacement requested this frame, consumed by the physics step
    pub pending_dx: f32,
}

impl Body {
    pub fn new(kind: BodyKind) -> Self {
        Self { kind, vel_y: 0.0, grounded: false, pending_dx: 0.0 }
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    /// Queue a horizontal move for this frame.
    pub fn move_by(&mut self, dx: f32) {
        self.pending_dx += dx;
    }

    pub fn jump(&mut self, force: f32) {
        self.vel_y = -force;
        self.grounded = false;
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Gameplay tags. Collision handlers dispatch on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Player,
    /// Opens when headbutted
    Box,
    CoinSurprise,
    MushroomSurprise,
    Pipe,
    /// Hurts the player unless stomped
    Hostile,
    /// Power-up
    Mushroom,
    Coin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn add(&mut self, tag: Tag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub fn is(&self, tag: Tag) -> bool {
        self.0.contains(&tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub key: SpriteKey,
}

/// Destroy the entity once it is this far outside the camera view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offscreen {
    pub distance: f32,
}

// =============================================================================
// HUD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub size: f32,
    pub anchor: Anchor,
}

/// Drawn in screen space, ignores the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fixed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreCounter {
    pub value: u32,
}

// =============================================================================
// Recipes
// =============================================================================

/// One capability in an entity recipe. `World::add` turns a list of these
/// into components, the same way a tile table entry describes a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum Comp {
    Sprite(SpriteKey),
    Scale(f32),
    /// Collider sized from the sprite
    Area,
    Body(BodyKind),
    Patrol { speed: f32, dir: f32 },
    Grow { rate: f32 },
    Tag(Tag),
    Offscreen { distance: f32 },
    Text { text: String, size: f32 },
    Anchor(Anchor),
    Fixed,
}

impl Comp {
    pub fn static_body() -> Self {
        Comp::Body(BodyKind::Static)
    }

    pub fn dynamic_body() -> Self {
        Comp::Body(BodyKind::Dynamic)
    }
}

/// Fallback collider for recipes without a sprite.
pub const DEFAULT_AREA: Vec2 = Vec2::new(20.0, 20.0);
