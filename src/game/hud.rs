//! Score and level labels
//!
//! The score lives on the score label entity itself (`ScoreCounter`), so
//! tearing the scene down is all it takes to reset it.

use macroquad::prelude::vec2;

use super::components::{Anchor, Comp, ScoreCounter};
use super::entity::Entity;
use super::world::World;

/// HUD margin from the screen edge.
const MARGIN: f32 = 20.0;
const TOP: f32 = 6.0;

pub fn score_text(value: u32) -> String {
    format!("score: {}", value)
}

/// Handle to the score label. The level label never changes after spawn, so
/// nothing keeps hold of it.
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    score_label: Entity,
}

impl Hud {
    pub fn spawn(world: &mut World, level_name: &str, screen_width: f32, text_size: f32) -> Self {
        let score_label = world.add(
            vec2(MARGIN, TOP),
            &[Comp::Text { text: score_text(0), size: text_size }, Comp::Fixed],
        );
        world.scores.insert(score_label, ScoreCounter::default());

        world.add(
            vec2(screen_width - MARGIN, TOP),
            &[
                Comp::Text { text: level_name.to_string(), size: text_size },
                Comp::Anchor(Anchor::TopRight),
                Comp::Fixed,
            ],
        );

        Self { score_label }
    }

    pub fn score(&self, world: &World) -> u32 {
        world.scores.get(self.score_label).map(|s| s.value).unwrap_or(0)
    }

    /// Add points and refresh the label. Returns the new total.
    pub fn add_score(&self, world: &mut World, points: u32) -> u32 {
        let Some(counter) = world.scores.get_mut(self.score_label) else { return 0 };
        counter.value = counter.value.saturating_add(points);
        let value = counter.value;

        if let Some(label) = world.labels.get_mut(self.score_label) {
            label.text = score_text(value);
        }
        log::debug!("score {}", value);
        value
    }

    #[cfg(test)]
    pub fn score_label_text<'w>(&self, world: &'w World) -> Option<&'w str> {
        world.labels.get(self.score_label).map(|l| l.text.as_str())
    }
}
