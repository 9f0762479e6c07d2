//! Game World
//!
//! The World owns every entity of the running scene and one sparse storage
//! per component type. Entities are built from `Comp` recipe lists with
//! [`World::add`], which is how tile tables, box surprises and the HUD all
//! create things.
//!
//! Component types are fixed at compile time, so storages are plain fields
//! and systems can borrow two of them at once.

use macroquad::prelude::Vec2;

use super::behaviors::{Grow, Patrol};
use super::component::ComponentStorage;
use super::components::*;
use super::entity::{Entity, EntityAllocator};

pub struct World {
    entities: EntityAllocator,

    /// Entities queued for removal at end of frame
    despawn_queue: Vec<Entity>,

    // =========================================================================
    // Spatial / physics
    // =========================================================================
    pub transforms: ComponentStorage<Transform>,
    pub areas: ComponentStorage<Area>,
    pub bodies: ComponentStorage<Body>,

    // =========================================================================
    // Behaviour
    // =========================================================================
    pub patrols: ComponentStorage<Patrol>,
    pub grows: ComponentStorage<Grow>,
    pub offscreens: ComponentStorage<Offscreen>,

    // =========================================================================
    // Presentation / identity
    // =========================================================================
    pub sprites: ComponentStorage<Sprite>,
    pub tags: ComponentStorage<Tags>,
    pub labels: ComponentStorage<Label>,
    pub fixed: ComponentStorage<Fixed>,
    pub scores: ComponentStorage<ScoreCounter>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),

            transforms: ComponentStorage::new(),
            areas: ComponentStorage::new(),
            bodies: ComponentStorage::new(),

            patrols: ComponentStorage::new(),
            grows: ComponentStorage::new(),
            offscreens: ComponentStorage::new(),

            sprites: ComponentStorage::new(),
            tags: ComponentStorage::new(),
            labels: ComponentStorage::new(),
            fixed: ComponentStorage::new(),
            scores: ComponentStorage::new(),
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Spawn a bare entity at a position.
    pub fn spawn_at(&mut self, pos: Vec2) -> Entity {
        let entity = self.entities.allocate();
        self.transforms.insert(entity, Transform::at(pos));
        entity
    }

    /// Spawn an entity from a recipe. The collider (if requested) is sized from
    /// the sprite.
    pub fn add(&mut self, pos: Vec2, recipe: &[Comp]) -> Entity {
        let entity = self.spawn_at(pos);
        let mut wants_area = false;
        let mut label_anchor = Anchor::default();

        for comp in recipe {
            match comp {
                Comp::Sprite(key) => self.sprites.insert(entity, Sprite { key: *key }),
                Comp::Scale(scale) => {
                    if let Some(t) = self.transforms.get_mut(entity) {
                        t.scale = *scale;
                    }
                }
                Comp::Area => wants_area = true,
                Comp::Body(kind) => self.bodies.insert(entity, Body::new(*kind)),
                Comp::Patrol { speed, dir } => self.patrols.insert(entity, Patrol::new(*speed, *dir)),
                Comp::Grow { rate } => self.grows.insert(entity, Grow::new(*rate)),
                Comp::Tag(tag) => {
                    if let Some(tags) = self.tags.get_mut(entity) {
                        tags.add(*tag);
                    } else {
                        let mut tags = Tags::default();
                        tags.add(*tag);
                        self.tags.insert(entity, tags);
                    }
                }
                Comp::Offscreen { distance } => {
                    self.offscreens.insert(entity, Offscreen { distance: *distance })
                }
                Comp::Text { text, size } => self.labels.insert(
                    entity,
                    Label { text: text.clone(), size: *size, anchor: Anchor::default() },
                ),
                Comp::Anchor(anchor) => label_anchor = *anchor,
                Comp::Fixed => self.fixed.insert(entity, Fixed),
            }
        }

        if let Some(label) = self.labels.get_mut(entity) {
            label.anchor = label_anchor;
        }

        if wants_area {
            let size = self.sprites.get(entity).map(|s| s.key.size()).unwrap_or(DEFAULT_AREA);
            self.areas.insert(entity, Area { size });
        }

        entity
    }

    /// Remove an entity and all of its components now.
    pub fn destroy(&mut self, entity: Entity) {
        if !self.entities.free(entity) {
            return;
        }

        let idx = entity.index();
        self.transforms.clear_slot(idx);
        self.areas.clear_slot(idx);
        self.bodies.clear_slot(idx);
        self.patrols.clear_slot(idx);
        self.grows.clear_slot(idx);
        self.offscreens.clear_slot(idx);
        self.sprites.clear_slot(idx);
        self.tags.clear_slot(idx);
        self.labels.clear_slot(idx);
        self.fixed.clear_slot(idx);
        self.scores.clear_slot(idx);
    }

    /// Queue an entity for removal at end of frame. Use while iterating.
    pub fn destroy_later(&mut self, entity: Entity) {
        if self.is_alive(entity) && !self.despawn_queue.contains(&entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Process queued removals. Call at end of frame.
    pub fn flush_destroyed(&mut self) {
        let queue = std::mem::take(&mut self.despawn_queue);
        for entity in queue {
            self.destroy(entity);
        }
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn has_tag(&self, entity: Entity, tag: Tag) -> bool {
        self.tags.get(entity).is_some_and(|tags| tags.is(tag))
    }

    pub fn with_tag(&self, tag: Tag) -> Vec<Entity> {
        self.tags
            .iter()
            .filter(|(_, tags)| tags.is(tag))
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.transforms.get(entity).map(|t| t.pos)
    }

    /// Scaled collider size.
    pub fn collider_size(&self, entity: Entity) -> Option<Vec2> {
        let area = self.areas.get(entity)?;
        let scale = self.transforms.get(entity).map(|t| t.scale).unwrap_or(1.0);
        Some(area.size * scale)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteKey;
    use macroquad::prelude::vec2;

    #[test]
    fn test_add_builds_components_from_recipe() {
        let mut world = World::new();
        let pipe = world.add(
            vec2(240.0, 180.0),
            &[
                Comp::Sprite(SpriteKey::PipeTopLeft),
                Comp::Scale(0.5),
                Comp::Area,
                Comp::static_body(),
                Comp::Tag(Tag::Pipe),
            ],
        );

        assert_eq!(world.position(pipe), Some(vec2(240.0, 180.0)));
        assert_eq!(world.areas.get(pipe).unwrap().size, vec2(40.0, 40.0));
        assert_eq!(world.collider_size(pipe), Some(vec2(20.0, 20.0)));
        assert!(world.bodies.get(pipe).unwrap().is_static());
        assert!(world.has_tag(pipe, Tag::Pipe));
        assert!(!world.has_tag(pipe, Tag::Box));
    }

    #[test]
    fn test_add_without_area_has_no_collider() {
        let mut world = World::new();
        let label = world.add(
            vec2(20.0, 6.0),
            &[
                Comp::Text { text: "score: 0".into(), size: 14.0 },
                Comp::Anchor(Anchor::TopRight),
                Comp::Fixed,
            ],
        );

        assert!(world.collider_size(label).is_none());
        assert_eq!(world.labels.get(label).unwrap().anchor, Anchor::TopRight);
        assert!(world.fixed.contains(label));
    }

    #[test]
    fn test_destroy_removes_all_components() {
        let mut world = World::new();
        let coin = world.add(vec2(0.0, 0.0), &[Comp::Sprite(SpriteKey::Coin), Comp::Area, Comp::Tag(Tag::Coin)]);
        let brick = world.add(vec2(20.0, 0.0), &[Comp::Sprite(SpriteKey::Brick)]);

        world.destroy(coin);
        assert!(!world.is_alive(coin));
        assert!(world.with_tag(Tag::Coin).is_empty());
        assert!(world.position(coin).is_none());
        assert_eq!(world.entity_count(), 1);

        // Slot reuse must not resurrect the coin's components
        let reused = world.spawn_at(vec2(5.0, 5.0));
        assert_eq!(reused.index(), coin.index());
        assert!(!world.has_tag(reused, Tag::Coin));
        assert!(world.is_alive(brick));
    }

    #[test]
    fn test_destroy_later_waits_for_flush() {
        let mut world = World::new();
        let e = world.spawn_at(Vec2::ZERO);

        world.destroy_later(e);
        world.destroy_later(e);
        assert!(world.is_alive(e));

        world.flush_destroyed();
        assert!(!world.is_alive(e));
        assert_eq!(world.entity_count(), 0);
    }
}
