//! Player Controller
//!
//! Turns a `FrameInput` into movement and jumps, and reacts to what the
//! player bumps into: stomping or getting hurt by hostiles, eating
//! mushrooms, collecting coins and opening boxes from below.

use macroquad::prelude::{vec2, Vec2};

use crate::assets::SpriteKey;
use crate::config::GameConfig;
use crate::input::FrameInput;

use super::components::{Comp, Tag};
use super::entity::Entity;
use super::event::{CollisionEvent, HeadbuttEvent, Side};
use super::hud::Hud;
use super::world::World;

/// What a collision did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Nothing the scene needs to know about
    Survived,
    /// Small player touched a hostile
    Died,
}

pub struct PlayerController {
    entity: Entity,
    move_speed: f32,
    jump_force: f32,
    score_step: u32,
    tile_height: f32,
    mushroom_speed: f32,
    offscreen_distance: f32,
}

impl PlayerController {
    pub fn spawn(world: &mut World, config: &GameConfig) -> Self {
        let entity = world.add(
            config.spawn_point(),
            &[
                Comp::Sprite(SpriteKey::MarioStanding),
                Comp::Area,
                Comp::dynamic_body(),
                Comp::Grow { rate: config.grow_rate },
                Comp::Tag(Tag::Player),
            ],
        );
        log::debug!("player spawned at {:?}", config.spawn_point());

        Self {
            entity,
            move_speed: config.move_speed,
            jump_force: config.jump_force,
            score_step: config.score_step,
            tile_height: config.tile_height,
            mushroom_speed: config.mushroom_speed(),
            offscreen_distance: config.offscreen_distance,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn position(&self, world: &World) -> Option<Vec2> {
        world.position(self.entity)
    }

    /// Center of the player's collider, what the camera follows.
    pub fn center(&self, world: &World) -> Option<Vec2> {
        let pos = world.position(self.entity)?;
        let size = world.collider_size(self.entity).unwrap_or(Vec2::ZERO);
        Some(pos + size * 0.5)
    }

    pub fn is_big(&self, world: &World) -> bool {
        world.grows.get(self.entity).is_some_and(|g| g.is_big())
    }

    pub fn is_grounded(&self, world: &World) -> bool {
        world.bodies.get(self.entity).is_some_and(|b| b.grounded)
    }

    /// Held directions walk at a constant speed; a jump press only counts
    /// while standing on something.
    pub fn apply_input(&self, world: &mut World, input: &FrameInput, dt: f32) {
        let grounded = self.is_grounded(world);
        let Some(body) = world.bodies.get_mut(self.entity) else { return };

        let dir = input.horizontal();
        if dir != 0.0 {
            body.move_by(dir * self.move_speed * dt);
        }
        if input.jump && grounded {
            body.jump(self.jump_force);
        }
    }

    /// React to a contact seen from the player's side.
    pub fn handle_collision(&self, world: &mut World, hud: &Hud, event: &CollisionEvent) -> HitOutcome {
        if event.entity != self.entity || !world.is_alive(event.other) {
            return HitOutcome::Survived;
        }
        let other = event.other;

        if world.has_tag(other, Tag::Hostile) {
            if event.side == Side::Bottom {
                world.destroy(other);
                hud.add_score(world, self.score_step);
                log::debug!("stomped {:?}", other);
            } else if self.is_big(world) {
                if let Some(grow) = world.grows.get_mut(self.entity) {
                    grow.smallify();
                }
                log::debug!("hit while big, shrinking");
            } else {
                log::info!("player killed by {:?}", other);
                return HitOutcome::Died;
            }
        } else if world.has_tag(other, Tag::Mushroom) {
            world.destroy(other);
            if let Some(grow) = world.grows.get_mut(self.entity) {
                grow.biggify();
            }
        } else if world.has_tag(other, Tag::Coin) {
            world.destroy(other);
            hud.add_score(world, self.score_step);
        }

        HitOutcome::Survived
    }

    /// Open a box the player jumped into from below.
    pub fn handle_headbutt(&self, world: &mut World, event: &HeadbuttEvent) {
        if event.entity != self.entity || !world.has_tag(event.other, Tag::Box) {
            return;
        }
        let block = event.other;
        let Some(pos) = world.position(block) else { return };
        let above = pos - vec2(0.0, self.tile_height);

        if world.has_tag(block, Tag::CoinSurprise) {
            world.add(above, &[Comp::Sprite(SpriteKey::Coin), Comp::Area, Comp::Tag(Tag::Coin)]);
        } else if world.has_tag(block, Tag::MushroomSurprise) {
            world.add(
                above,
                &[
                    Comp::Sprite(SpriteKey::Mushroom),
                    Comp::Area,
                    Comp::dynamic_body(),
                    Comp::Offscreen { distance: self.offscreen_distance },
                    Comp::Patrol { speed: self.mushroom_speed, dir: 1.0 },
                    Comp::Tag(Tag::Mushroom),
                ],
            );
        }

        world.destroy(block);
        world.add(pos, &[Comp::Sprite(SpriteKey::Unboxed), Comp::Area, Comp::static_body()]);
        log::debug!("opened box at {:?}", pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, Hud, PlayerController) {
        let mut world = World::new();
        let hud = Hud::spawn(&mut world, "Level 0", 800.0, 14.0);
        let player = PlayerController::spawn(&mut world, &GameConfig::default());
        (world, hud, player)
    }

    fn hit(player: &PlayerController, other: Entity, side: Side) -> CollisionEvent {
        CollisionEvent { entity: player.entity(), other, side }
    }

    fn shroom(world: &mut World) -> Entity {
        world.add(
            vec2(100.0, 0.0),
            &[Comp::Sprite(SpriteKey::EvilShroom), Comp::Area, Comp::dynamic_body(), Comp::Tag(Tag::Hostile)],
        )
    }

    #[test]
    fn test_spawn_uses_config() {
        let (world, _, player) = setup();
        assert_eq!(player.position(&world), Some(vec2(30.0, 0.0)));
        assert!(world.has_tag(player.entity(), Tag::Player));
        assert!(!player.is_big(&world));
        assert_eq!(player.center(&world), Some(vec2(40.0, 10.0)));
    }

    #[test]
    fn test_walk_is_per_second() {
        let (mut world, _, player) = setup();
        let input = FrameInput { right: true, ..Default::default() };

        player.apply_input(&mut world, &input, 0.5);
        assert_eq!(world.bodies.get(player.entity()).unwrap().pending_dx, 60.0);
    }

    #[test]
    fn test_jump_needs_ground() {
        let (mut world, _, player) = setup();
        let input = FrameInput { jump: true, ..Default::default() };

        player.apply_input(&mut world, &input, 1.0 / 60.0);
        assert_eq!(world.bodies.get(player.entity()).unwrap().vel_y, 0.0);

        world.bodies.get_mut(player.entity()).unwrap().grounded = true;
        player.apply_input(&mut world, &input, 1.0 / 60.0);
        let body = world.bodies.get(player.entity()).unwrap();
        assert_eq!(body.vel_y, -640.0);
        assert!(!body.grounded);
    }

    #[test]
    fn test_two_coins_score_twenty() {
        let (mut world, hud, player) = setup();
        for x in [100.0, 140.0] {
            let coin = world.add(vec2(x, 0.0), &[Comp::Sprite(SpriteKey::Coin), Comp::Area, Comp::Tag(Tag::Coin)]);
            let outcome = player.handle_collision(&mut world, &hud, &hit(&player, coin, Side::Right));
            assert_eq!(outcome, HitOutcome::Survived);
            assert!(!world.is_alive(coin));
        }

        assert_eq!(hud.score(&world), 20);
        assert_eq!(hud.score_label_text(&world), Some("score: 20"));
    }

    #[test]
    fn test_stomp_awards_points() {
        let (mut world, hud, player) = setup();
        let enemy = shroom(&mut world);

        let outcome = player.handle_collision(&mut world, &hud, &hit(&player, enemy, Side::Bottom));

        assert_eq!(outcome, HitOutcome::Survived);
        assert!(!world.is_alive(enemy));
        assert_eq!(hud.score(&world), 10);
    }

    #[test]
    fn test_small_player_dies_from_side_hit() {
        let (mut world, hud, player) = setup();
        hud.add_score(&mut world, 30);
        let enemy = shroom(&mut world);

        let outcome = player.handle_collision(&mut world, &hud, &hit(&player, enemy, Side::Left));

        assert_eq!(outcome, HitOutcome::Died);
        assert!(world.is_alive(enemy));
        assert_eq!(hud.score(&world), 30);
    }

    #[test]
    fn test_big_player_shrinks_instead_of_dying() {
        let (mut world, hud, player) = setup();
        let mushroom = world.add(vec2(60.0, 0.0), &[Comp::Area, Comp::Tag(Tag::Mushroom)]);
        player.handle_collision(&mut world, &hud, &hit(&player, mushroom, Side::Right));
        assert!(player.is_big(&world));
        assert!(!world.is_alive(mushroom));

        let enemy = shroom(&mut world);
        let outcome = player.handle_collision(&mut world, &hud, &hit(&player, enemy, Side::Top));

        assert_eq!(outcome, HitOutcome::Survived);
        assert!(!player.is_big(&world));
        assert!(world.is_alive(enemy));
        assert_eq!(hud.score(&world), 0);
    }

    #[test]
    fn test_events_for_other_entities_are_ignored() {
        let (mut world, hud, player) = setup();
        let enemy = shroom(&mut world);
        let event = CollisionEvent { entity: enemy, other: player.entity(), side: Side::Right };

        assert_eq!(player.handle_collision(&mut world, &hud, &event), HitOutcome::Survived);
        assert!(world.is_alive(enemy));
    }

    #[test]
    fn test_headbutt_coin_box() {
        let (mut world, _, player) = setup();
        let block = world.add(
            vec2(120.0, 120.0),
            &[
                Comp::Sprite(SpriteKey::Question),
                Comp::Area,
                Comp::static_body(),
                Comp::Tag(Tag::CoinSurprise),
                Comp::Tag(Tag::Box),
            ],
        );

        player.handle_headbutt(&mut world, &HeadbuttEvent { entity: player.entity(), other: block });

        assert!(!world.is_alive(block));
        let coins = world.with_tag(Tag::Coin);
        assert_eq!(coins.len(), 1);
        assert_eq!(world.position(coins[0]), Some(vec2(120.0, 100.0)));

        let unboxed: Vec<_> = world
            .sprites
            .iter()
            .filter(|(_, s)| s.key == SpriteKey::Unboxed)
            .map(|(e, _)| e)
            .collect();
        assert_eq!(unboxed.len(), 1);
        assert_eq!(world.position(unboxed[0]), Some(vec2(120.0, 120.0)));
        assert!(world.bodies.get(unboxed[0]).unwrap().is_static());
        assert!(!world.has_tag(unboxed[0], Tag::Box));
    }

    #[test]
    fn test_headbutt_mushroom_box() {
        let (mut world, _, player) = setup();
        let block = world.add(
            vec2(200.0, 120.0),
            &[Comp::Area, Comp::static_body(), Comp::Tag(Tag::MushroomSurprise), Comp::Tag(Tag::Box)],
        );

        player.handle_headbutt(&mut world, &HeadbuttEvent { entity: player.entity(), other: block });

        let mushrooms = world.with_tag(Tag::Mushroom);
        assert_eq!(mushrooms.len(), 1);
        let m = mushrooms[0];
        assert_eq!(world.position(m), Some(vec2(200.0, 100.0)));
        assert_eq!(world.patrols.get(m).unwrap().velocity(), 90.0);
        assert!(world.offscreens.contains(m));
        assert!(!world.bodies.get(m).unwrap().is_static());
    }

    #[test]
    fn test_headbutt_plain_brick_does_nothing() {
        let (mut world, _, player) = setup();
        let brick = world.add(vec2(0.0, 0.0), &[Comp::Area, Comp::static_body()]);
        let before = world.entity_count();

        player.handle_headbutt(&mut world, &HeadbuttEvent { entity: player.entity(), other: brick });

        assert!(world.is_alive(brick));
        assert_eq!(world.entity_count(), before);
    }
}
