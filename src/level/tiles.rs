//! Tile map loader
//!
//! Each symbol in a level grid maps to a recipe (`Vec<Comp>`). Loading a map
//! spawns one entity per recognised, non-blank cell at
//! `(col * tile_width, row * tile_height)`. Blanks and unknown symbols are
//! skipped.

use std::collections::BTreeMap;

use macroquad::prelude::{vec2, Vec2};

use crate::assets::SpriteKey;
use crate::config::GameConfig;
use crate::game::components::{Comp, Tag};
use crate::game::{Entity, World};

/// Symbol → entity recipe.
#[derive(Debug, Clone, Default)]
pub struct TileTable {
    entries: BTreeMap<char, Vec<Comp>>,
}

impl TileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: char, recipe: Vec<Comp>) {
        self.entries.insert(symbol, recipe);
    }

    pub fn get(&self, symbol: char) -> Option<&[Comp]> {
        self.entries.get(&symbol).map(|r| r.as_slice())
    }

    /// The demo's tiles: ground, question boxes, pipes and shrooms.
    pub fn standard(config: &GameConfig) -> Self {
        let solid = |key| vec![Comp::Sprite(key), Comp::Area, Comp::static_body()];
        let pipe = |key| vec![Comp::Sprite(key), Comp::Scale(0.5), Comp::Area, Comp::static_body()];

        let mut table = Self::new();
        table.insert('=', solid(SpriteKey::Block));
        table.insert('x', solid(SpriteKey::Brick));
        table.insert('}', solid(SpriteKey::Unboxed));

        let mut coin_box = solid(SpriteKey::Question);
        coin_box.extend([Comp::Tag(Tag::CoinSurprise), Comp::Tag(Tag::Box)]);
        table.insert('%', coin_box);

        let mut mushroom_box = solid(SpriteKey::Question);
        mushroom_box.extend([Comp::Tag(Tag::MushroomSurprise), Comp::Tag(Tag::Box)]);
        table.insert('*', mushroom_box);

        table.insert('(', pipe(SpriteKey::PipeLeft));
        table.insert(')', pipe(SpriteKey::PipeRight));
        let mut pipe_top_left = pipe(SpriteKey::PipeTopLeft);
        pipe_top_left.push(Comp::Tag(Tag::Pipe));
        table.insert('-', pipe_top_left);
        let mut pipe_top_right = pipe(SpriteKey::PipeTopRight);
        pipe_top_right.push(Comp::Tag(Tag::Pipe));
        table.insert('+', pipe_top_right);

        table.insert(
            '^',
            vec![
                Comp::Sprite(SpriteKey::EvilShroom),
                Comp::Area,
                Comp::dynamic_body(),
                Comp::Patrol { speed: config.enemy_speed(), dir: -1.0 },
                Comp::Tag(Tag::Hostile),
            ],
        );

        table
    }
}

/// Pixel position of a grid cell.
pub fn cell_position(row: usize, col: usize, tile: Vec2) -> Vec2 {
    vec2(col as f32 * tile.x, row as f32 * tile.y)
}

/// Spawn every tile of `rows` into `world`. Returns the spawned entities in
/// row-major order.
pub fn spawn_map<S: AsRef<str>>(world: &mut World, rows: &[S], table: &TileTable, tile: Vec2) -> Vec<Entity> {
    let mut spawned = Vec::new();

    for (row, line) in rows.iter().enumerate() {
        for (col, symbol) in line.as_ref().chars().enumerate() {
            if symbol == ' ' {
                continue;
            }
            match table.get(symbol) {
                Some(recipe) => spawned.push(world.add(cell_position(row, col, tile), recipe)),
                None => log::trace!("no tile for '{}' at {},{}", symbol, row, col),
            }
        }
    }

    log::debug!("spawned {} tiles", spawned.len());
    spawned
}
