//! Collision System
//!
//! Axis-separated AABB physics for a tile world:
//! 1. Dynamic bodies accumulate gravity
//! 2. Queued horizontal moves are applied, then pushed back out of static
//!    bodies the move ran into (Left/Right contacts)
//! 3. Vertical velocity is applied, then pushed back out of static bodies
//!    the move ran into (Bottom contact = landed, Top contact = headbutt)
//!
//! A body only collides with a solid on the axis it approached it from, so a
//! body already overlapping a wall (after growing, say) is never snapped on
//! top of it.
//! 4. Remaining overlaps (dynamic vs dynamic, area-only colliders) are
//!    classified along the axis of least penetration
//!
//! Only contacts that did not exist on the previous step are reported, so a
//! player standing on a brick or overlapping a shroom gets one event, not one
//! per frame.

use std::collections::HashSet;

use macroquad::prelude::Vec2;

use super::components::BodyKind;
use super::entity::Entity;
use super::event::{CollisionEvent, Events, HeadbuttEvent, Side};
use super::world::World;

/// Axis-aligned box, `min` is the top-left corner (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, max: pos + size }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Overlap depth on each axis (only meaningful when overlapping).
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }

    /// Side of `self` that `other` touches, by least penetration.
    pub fn contact_side(&self, other: &Aabb) -> Side {
        let pen = self.penetration(other);
        let (a, b) = (self.center(), other.center());
        if pen.y <= pen.x {
            if a.y < b.y { Side::Bottom } else { Side::Top }
        } else if a.x < b.x {
            Side::Right
        } else {
            Side::Left
        }
    }
}

/// The entity's world-space collider, if it has an area.
pub fn collider(world: &World, entity: Entity) -> Option<Aabb> {
    let pos = world.position(entity)?;
    let size = world.collider_size(entity)?;
    Some(Aabb::new(pos, size))
}

/// Tolerance for "was already on the far side of this edge" checks.
const EDGE_SLOP: f32 = 0.01;

/// Slide `entity` sideways out of static bodies it overlaps from the side.
/// Floor and ceiling overlaps are left alone.
pub fn clear_walls(world: &mut World, entity: Entity) {
    let Some(bounds) = collider(world, entity) else { return };

    let mut shift = 0.0f32;
    for (other, body) in world.bodies.iter() {
        if other == entity || !body.is_static() {
            continue;
        }
        let Some(wall) = collider(world, other) else { continue };
        if !bounds.overlaps(&wall) {
            continue;
        }
        match bounds.contact_side(&wall) {
            Side::Right => shift = shift.min(wall.min.x - bounds.max.x),
            Side::Left => shift = shift.max(wall.max.x - bounds.min.x),
            Side::Top | Side::Bottom => {}
        }
    }

    if shift != 0.0 {
        if let Some(transform) = world.transforms.get_mut(entity) {
            transform.pos.x += shift;
        }
    }
}

/// How an entity takes part in collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Solid,
    Dynamic,
    /// Area without a body: overlaps only
    Ghost,
}

/// One contact found this step, seen from `a`.
#[derive(Debug, Clone, Copy)]
struct Contact {
    a: Entity,
    b: Entity,
    side: Side,
    headbutt: bool,
}

fn pair_key(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Gravity plus the set of contacts alive after the previous step.
pub struct Physics {
    pub gravity: f32,
    touching: HashSet<(Entity, Entity)>,
}

impl Physics {
    pub fn new(gravity: f32) -> Self {
        Self { gravity, touching: HashSet::new() }
    }

    pub fn step(&mut self, world: &mut World, events: &mut Events, dt: f32) {
        let mut colliders: Vec<(Entity, Role)> = world
            .areas
            .iter()
            .map(|(entity, _)| {
                let role = match world.bodies.get(entity).map(|b| b.kind) {
                    Some(BodyKind::Static) => Role::Solid,
                    Some(BodyKind::Dynamic) => Role::Dynamic,
                    None => Role::Ghost,
                };
                (entity, role)
            })
            .collect();
        colliders.sort_by_key(|(entity, _)| *entity);

        let solids: Vec<(Entity, Aabb)> = colliders
            .iter()
            .filter(|(_, role)| *role == Role::Solid)
            .filter_map(|(e, _)| collider(world, *e).map(|b| (*e, b)))
            .collect();

        let mut contacts = Vec::new();

        for &(entity, role) in &colliders {
            if role == Role::Dynamic {
                self.move_body(world, entity, &solids, dt, &mut contacts);
            }
        }

        // Overlap pass for everything the solver does not separate
        let boxes: Vec<(Entity, Role, Aabb)> = colliders
            .iter()
            .filter_map(|(e, role)| collider(world, *e).map(|b| (*e, *role, b)))
            .collect();
        for (i, &(a, role_a, box_a)) in boxes.iter().enumerate() {
            for &(b, role_b, box_b) in &boxes[i + 1..] {
                let needs_check = match (role_a, role_b) {
                    (Role::Solid, Role::Solid) => false,
                    (Role::Solid, Role::Dynamic) | (Role::Dynamic, Role::Solid) => false,
                    _ => role_a != Role::Solid || role_b != Role::Solid,
                };
                if needs_check && box_a.overlaps(&box_b) {
                    contacts.push(Contact { a, b, side: box_a.contact_side(&box_b), headbutt: false });
                }
            }
        }

        self.emit(contacts, events);
    }

    /// Integrate one dynamic body and resolve it against the static world.
    fn move_body(
        &self,
        world: &mut World,
        entity: Entity,
        solids: &[(Entity, Aabb)],
        dt: f32,
        contacts: &mut Vec<Contact>,
    ) {
        let Some(size) = world.collider_size(entity) else { return };
        let Some(body) = world.bodies.get_mut(entity) else { return };

        body.vel_y += self.gravity * dt;
        let dx = std::mem::take(&mut body.pending_dx);
        let dy = body.vel_y * dt;
        let mut vel_y = body.vel_y;
        let mut grounded = false;

        let Some(transform) = world.transforms.get_mut(entity) else { return };
        let mut pos = transform.pos;

        // Horizontal: only walls that were ahead of the body before the move
        let start = Aabb::new(pos, size);
        pos.x += dx;
        if dx != 0.0 {
            let hits: Vec<_> = overlapping(solids, entity, Aabb::new(pos, size))
                .into_iter()
                .filter(|(_, b)| {
                    if dx > 0.0 {
                        start.max.x <= b.min.x + EDGE_SLOP
                    } else {
                        start.min.x >= b.max.x - EDGE_SLOP
                    }
                })
                .collect();
            if !hits.is_empty() {
                let side = if dx > 0.0 {
                    let wall = hits.iter().map(|(_, b)| b.min.x).fold(f32::INFINITY, f32::min);
                    pos.x = wall - size.x;
                    Side::Right
                } else {
                    let wall = hits.iter().map(|(_, b)| b.max.x).fold(f32::NEG_INFINITY, f32::max);
                    pos.x = wall;
                    Side::Left
                };
                for (other, _) in hits {
                    contacts.push(Contact { a: entity, b: other, side, headbutt: false });
                }
            }
        }

        // Vertical: only tiles above or below the body before the move
        let start = Aabb::new(pos, size);
        pos.y += dy;
        if dy != 0.0 {
            let hits: Vec<_> = overlapping(solids, entity, Aabb::new(pos, size))
                .into_iter()
                .filter(|(_, b)| {
                    if dy > 0.0 {
                        start.max.y <= b.min.y + EDGE_SLOP
                    } else {
                        start.min.y >= b.max.y - EDGE_SLOP
                    }
                })
                .collect();
            if !hits.is_empty() {
                let rising = dy < 0.0;
                if rising {
                    let ceiling = hits.iter().map(|(_, b)| b.max.y).fold(f32::NEG_INFINITY, f32::max);
                    pos.y = ceiling;
                } else {
                    let floor = hits.iter().map(|(_, b)| b.min.y).fold(f32::INFINITY, f32::min);
                    pos.y = floor - size.y;
                    grounded = true;
                }
                vel_y = 0.0;
                let side = if rising { Side::Top } else { Side::Bottom };
                for (other, _) in hits {
                    contacts.push(Contact { a: entity, b: other, side, headbutt: rising });
                }
            }
        }

        transform.pos = pos;
        if let Some(body) = world.bodies.get_mut(entity) {
            body.vel_y = vel_y;
            body.grounded = grounded;
        }
    }

    /// Report new contacts and remember this step's set.
    fn emit(&mut self, contacts: Vec<Contact>, events: &mut Events) {
        let mut now = HashSet::with_capacity(contacts.len());

        for contact in contacts {
            let key = pair_key(contact.a, contact.b);
            if !now.insert(key) || self.touching.contains(&key) {
                continue;
            }

            events.collisions.send(CollisionEvent {
                entity: contact.a,
                other: contact.b,
                side: contact.side,
            });
            events.collisions.send(CollisionEvent {
                entity: contact.b,
                other: contact.a,
                side: contact.side.opposite(),
            });
            if contact.headbutt {
                events.headbutts.send(HeadbuttEvent { entity: contact.a, other: contact.b });
            }
        }

        self.touching = now;
    }
}

fn overlapping(solids: &[(Entity, Aabb)], entity: Entity, aabb: Aabb) -> Vec<(Entity, Aabb)> {
    solids
        .iter()
        .filter(|(other, b)| *other != entity && aabb.overlaps(b))
        .copied()
        .collect()
}
