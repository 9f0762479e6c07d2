//! Scene Renderer
//!
//! Draws a running level: sprites in world space relative to the camera,
//! then labels (fixed ones in screen space). Sprites without a loaded
//! texture are drawn as flat colored rectangles.

use macroquad::prelude::*;

use crate::assets::SpriteAtlas;

use super::components::{Anchor, Label};
use super::runtime::LevelSession;
use super::world::World;

const TEXT_COLOR: Color = WHITE;

/// Screen-space position of the world origin's top-left corner.
pub fn view_origin(camera: Vec2, screen: Vec2) -> Vec2 {
    camera - screen * 0.5
}

/// Top-left corner at which a `width`×`height` block must start so that
/// `pos` sits on its `anchor` point.
pub fn anchored_top_left(pos: Vec2, anchor: Anchor, width: f32, height: f32) -> Vec2 {
    match anchor {
        Anchor::TopLeft => pos,
        Anchor::TopRight => vec2(pos.x - width, pos.y),
        Anchor::Center => vec2(pos.x - width * 0.5, pos.y - height * 0.5),
    }
}

pub fn draw_session(session: &LevelSession, atlas: &SpriteAtlas) {
    let origin = view_origin(session.camera(), session.screen());
    draw_sprites(&session.world, atlas, origin, session.screen());
    draw_labels(&session.world, origin);
}

fn draw_sprites(world: &World, atlas: &SpriteAtlas, origin: Vec2, screen: Vec2) {
    for (entity, sprite) in world.sprites.iter() {
        let Some(transform) = world.transforms.get(entity) else { continue };
        let size = sprite.key.size() * transform.scale;
        let screen_pos = transform.pos - origin;

        if screen_pos.x + size.x < 0.0
            || screen_pos.y + size.y < 0.0
            || screen_pos.x > screen.x
            || screen_pos.y > screen.y
        {
            continue;
        }

        match atlas.get(sprite.key) {
            Some(texture) => draw_texture_ex(
                texture,
                screen_pos.x,
                screen_pos.y,
                WHITE,
                DrawTextureParams { dest_size: Some(size), ..Default::default() },
            ),
            None => draw_rectangle(screen_pos.x, screen_pos.y, size.x, size.y, sprite.key.fallback_color()),
        }
    }
}

fn draw_labels(world: &World, origin: Vec2) {
    for (entity, label) in world.labels.iter() {
        let Some(pos) = world.position(entity) else { continue };
        let pos = if world.fixed.contains(entity) { pos } else { pos - origin };
        draw_label(label, pos);
    }
}

/// Multi-line text, each line aligned per the label's anchor.
fn draw_label(label: &Label, pos: Vec2) {
    let font_size = label.size.round().max(1.0) as u16;
    let lines: Vec<&str> = label.text.lines().collect();
    let line_height = label.size * 1.25;
    let block_height = line_height * lines.len() as f32;

    for (i, line) in lines.iter().enumerate() {
        let dims = measure_text(line, None, font_size, 1.0);
        let line_anchor = vec2(pos.x, pos.y - block_height * 0.5 + line_height * (i as f32 + 0.5));
        let top_left = match label.anchor {
            Anchor::Center => anchored_top_left(line_anchor, Anchor::Center, dims.width, dims.height),
            anchor => anchored_top_left(vec2(pos.x, pos.y + line_height * i as f32), anchor, dims.width, dims.height),
        };
        // draw_text takes the baseline
        draw_text(line, top_left.x, top_left.y + dims.offset_y, label.size, TEXT_COLOR);
    }
}

/// Centered text on an otherwise empty screen.
pub fn draw_centered_text(text: &str, size: f32) {
    let label = Label { text: text.to_string(), size, anchor: Anchor::Center };
    draw_label(&label, vec2(screen_width() * 0.5, screen_height() * 0.5));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_origin_centers_camera() {
        let origin = view_origin(vec2(40.0, 210.0), vec2(800.0, 600.0));
        assert_eq!(origin, vec2(-360.0, -90.0));
        // The camera point lands mid-screen
        assert_eq!(vec2(40.0, 210.0) - origin, vec2(400.0, 300.0));
    }

    #[test]
    fn test_anchored_top_left() {
        let pos = vec2(780.0, 6.0);
        assert_eq!(anchored_top_left(pos, Anchor::TopLeft, 50.0, 14.0), pos);
        assert_eq!(anchored_top_left(pos, Anchor::TopRight, 50.0, 14.0), vec2(730.0, 6.0));
        assert_eq!(anchored_top_left(vec2(400.0, 300.0), Anchor::Center, 100.0, 20.0), vec2(350.0, 290.0));
    }
}
