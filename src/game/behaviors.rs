//! Reusable entity behaviours
//!
//! `Patrol` walks an entity left and right, turning around when it bumps into
//! something sideways. `Grow` eases an entity's scale toward 1 or 2 for the
//! power-up. Both are plain structs stored as components; the systems below
//! drive them once per frame.

use super::collision::clear_walls;
use super::event::{CollisionEvent, Side};
use super::world::World;

/// Horizontal walker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    speed: f32,
    dir: f32,
}

impl Patrol {
    /// `dir` is normalised to ±1.
    pub fn new(speed: f32, dir: f32) -> Self {
        Self { speed, dir: if dir < 0.0 { -1.0 } else { 1.0 } }
    }

    pub fn dir(&self) -> f32 {
        self.dir
    }

    /// Signed px/s this frame.
    pub fn velocity(&self) -> f32 {
        self.speed * self.dir
    }

    /// Turn around on side contacts. Every side contact flips, so two in the
    /// same frame cancel out.
    pub fn on_collide(&mut self, side: Side) {
        if side.is_horizontal() {
            self.dir = -self.dir;
        }
    }
}

/// Power-up scale state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grow {
    big: bool,
    target: f32,
    rate: f32,
}

impl Grow {
    pub const SMALL_SCALE: f32 = 1.0;
    pub const BIG_SCALE: f32 = 2.0;

    pub fn new(rate: f32) -> Self {
        Self { big: false, target: Self::SMALL_SCALE, rate }
    }

    pub fn is_big(&self) -> bool {
        self.big
    }

    pub fn biggify(&mut self) {
        self.target = Self::BIG_SCALE;
        self.big = true;
    }

    pub fn smallify(&mut self) {
        self.target = Self::SMALL_SCALE;
        self.big = false;
    }

    /// Next scale after `dt` seconds of exponential easing. The blend factor
    /// is capped at 1, so the result never passes the target.
    pub fn step(&self, scale: f32, dt: f32) -> f32 {
        let t = (dt * self.rate).clamp(0.0, 1.0);
        let next = scale + (self.target - scale) * t;
        if (self.target - next).abs() < 1e-3 {
            self.target
        } else {
            next
        }
    }
}

// =============================================================================
// Systems
// =============================================================================

/// Queue this frame's patrol movement on each walker's body.
pub fn patrol_system(world: &mut World, dt: f32) {
    let moves: Vec<_> = world
        .patrols
        .iter()
        .map(|(entity, patrol)| (entity, patrol.velocity() * dt))
        .collect();

    for (entity, dx) in moves {
        if let Some(body) = world.bodies.get_mut(entity) {
            body.move_by(dx);
        }
    }
}

/// Feed a contact to the patrol of the entity that experienced it.
pub fn patrol_collision(world: &mut World, event: &CollisionEvent) {
    if let Some(patrol) = world.patrols.get_mut(event.entity) {
        patrol.on_collide(event.side);
    }
}

/// Ease every growing entity toward its target scale, keeping its feet where
/// they are so a growing player does not sink into the floor. A collider that
/// widens into a wall is slid back out sideways.
pub fn grow_system(world: &mut World, dt: f32) {
    let updates: Vec<_> = world
        .grows
        .iter()
        .map(|(entity, grow)| (entity, *grow))
        .collect();

    for (entity, grow) in updates {
        let height = world.areas.get(entity).map(|a| a.size.y).unwrap_or(0.0);
        let Some(transform) = world.transforms.get_mut(entity) else { continue };
        let next = grow.step(transform.scale, dt);
        if next == transform.scale {
            continue;
        }
        transform.pos.y -= height * (next - transform.scale);
        transform.scale = next;

        clear_walls(world, entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{Comp, Transform};
    use macroquad::prelude::vec2;

    #[test]
    fn test_patrol_flips_only_on_side_contacts() {
        let mut patrol = Patrol::new(60.0, -1.0);
        assert_eq!(patrol.velocity(), -60.0);

        patrol.on_collide(Side::Top);
        patrol.on_collide(Side::Bottom);
        assert_eq!(patrol.dir(), -1.0);

        patrol.on_collide(Side::Left);
        assert_eq!(patrol.dir(), 1.0);
        patrol.on_collide(Side::Right);
        assert_eq!(patrol.dir(), -1.0);
    }

    #[test]
    fn test_patrol_double_side_contact_cancels() {
        let mut patrol = Patrol::new(60.0, 1.0);
        patrol.on_collide(Side::Left);
        patrol.on_collide(Side::Right);
        assert_eq!(patrol.dir(), 1.0);
    }

    #[test]
    fn test_grow_converges_monotonically_without_overshoot() {
        let mut grow = Grow::new(6.0);
        grow.biggify();
        assert!(grow.is_big());

        let mut scale = 1.0;
        for _ in 0..120 {
            let next = grow.step(scale, 1.0 / 60.0);
            assert!(next >= scale);
            assert!(next <= Grow::BIG_SCALE);
            scale = next;
        }
        assert_eq!(scale, Grow::BIG_SCALE);

        grow.smallify();
        assert!(!grow.is_big());
        for _ in 0..120 {
            let next = grow.step(scale, 1.0 / 60.0);
            assert!(next <= scale);
            assert!(next >= Grow::SMALL_SCALE);
            scale = next;
        }
        assert_eq!(scale, Grow::SMALL_SCALE);
    }

    #[test]
    fn test_grow_huge_dt_lands_on_target() {
        let mut grow = Grow::new(6.0);
        grow.biggify();
        assert_eq!(grow.step(1.0, 10.0), Grow::BIG_SCALE);
    }

    #[test]
    fn test_patrol_system_queues_movement() {
        let mut world = World::new();
        let shroom = world.add(
            vec2(100.0, 0.0),
            &[Comp::Area, Comp::dynamic_body(), Comp::Patrol { speed: 60.0, dir: -1.0 }],
        );

        patrol_system(&mut world, 0.5);
        assert_eq!(world.bodies.get(shroom).unwrap().pending_dx, -30.0);
    }

    #[test]
    fn test_grow_system_keeps_feet_planted() {
        let mut world = World::new();
        let e = world.add(vec2(0.0, 180.0), &[Comp::Area, Comp::Grow { rate: 6.0 }]);
        world.grows.get_mut(e).unwrap().biggify();

        for _ in 0..240 {
            grow_system(&mut world, 1.0 / 60.0);
        }

        let t: Transform = *world.transforms.get(e).unwrap();
        assert_eq!(t.scale, 2.0);
        // 20px tall sprite, bottom stays at y = 200
        assert!((t.pos.y + 20.0 * t.scale - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_growing_next_to_wall_slides_away_from_it() {
        let mut world = World::new();
        world.add(vec2(40.0, 80.0), &[Comp::Area, Comp::static_body()]);
        world.add(vec2(0.0, 100.0), &[Comp::Area, Comp::static_body()]);
        let e = world.add(vec2(20.0, 80.0), &[Comp::Area, Comp::Grow { rate: 6.0 }]);
        world.grows.get_mut(e).unwrap().biggify();

        for _ in 0..240 {
            grow_system(&mut world, 1.0 / 60.0);
        }

        let t: Transform = *world.transforms.get(e).unwrap();
        assert_eq!(t.scale, 2.0);
        assert!((t.pos.x + 40.0 - 40.0).abs() < 1e-3);
        assert!((t.pos.y + 40.0 - 100.0).abs() < 1e-3);
    }
}
