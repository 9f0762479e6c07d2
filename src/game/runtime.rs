//! Level Runtime
//!
//! One running instance of the `game` scene: the world built from a level,
//! the physics state, the HUD and the player. `tick` advances it by one
//! frame and reports when the scene has to change.

use macroquad::prelude::{vec2, Vec2};

use crate::config::GameConfig;
use crate::input::FrameInput;
use crate::level::{spawn_map, LevelDef, TileTable};

use super::behaviors::{grow_system, patrol_collision, patrol_system};
use super::collision::{collider, Aabb, Physics};
use super::components::Tag;
use super::event::Events;
use super::hud::Hud;
use super::player::{HitOutcome, PlayerController};
use super::world::World;

/// Why a session wants to leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Restart pressed: rebuild the level from scratch
    Restart,
    /// Player died; carries the final score
    GameOver { score: u32 },
}

pub struct LevelSession {
    pub world: World,
    events: Events,
    physics: Physics,
    hud: Hud,
    player: PlayerController,
    /// World point at the center of the screen
    camera: Vec2,
    screen: Vec2,
    fall_death: f32,
}

impl LevelSession {
    pub fn new(config: &GameConfig, level: &LevelDef, screen: Vec2) -> Self {
        let mut world = World::new();

        let table = TileTable::standard(config);
        spawn_map(&mut world, &level.rows, &table, config.tile_size());

        let hud = Hud::spawn(&mut world, &level.name, screen.x, config.hud_text_size);
        let player = PlayerController::spawn(&mut world, config);
        let camera = player.center(&world).unwrap_or(screen * 0.5);

        log::info!(
            "started '{}' with {} entities, {} hostile",
            level.name,
            world.entity_count(),
            world.with_tag(Tag::Hostile).len()
        );

        Self {
            world,
            events: Events::new(),
            physics: Physics::new(config.gravity),
            hud,
            player,
            camera,
            screen,
            fall_death: config.fall_death,
        }
    }

    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn score(&self) -> u32 {
        self.hud.score(&self.world)
    }

    /// World-space rectangle currently on screen.
    pub fn view(&self) -> Aabb {
        Aabb::new(self.camera - self.screen * 0.5, self.screen)
    }

    /// Advance one frame.
    pub fn tick(&mut self, input: &FrameInput, dt: f32) -> Option<SessionEvent> {
        if input.restart {
            log::info!("restart requested");
            return Some(SessionEvent::Restart);
        }

        self.player.apply_input(&mut self.world, input, dt);
        patrol_system(&mut self.world, dt);
        self.physics.step(&mut self.world, &mut self.events, dt);

        let mut died = false;
        for event in self.events.collisions.take() {
            patrol_collision(&mut self.world, &event);
            if event.entity == self.player.entity()
                && self.player.handle_collision(&mut self.world, &self.hud, &event) == HitOutcome::Died
            {
                died = true;
                break;
            }
        }
        if died {
            self.events.clear_all();
            return Some(SessionEvent::GameOver { score: self.score() });
        }

        for event in self.events.headbutts.take() {
            self.player.handle_headbutt(&mut self.world, &event);
        }

        grow_system(&mut self.world, dt);

        if let Some(center) = self.player.center(&self.world) {
            self.camera = center;
        }

        if self.player.position(&self.world).is_some_and(|p| p.y >= self.fall_death) {
            log::info!("player fell out of the level");
            return Some(SessionEvent::GameOver { score: self.score() });
        }

        let view = self.view();
        offscreen_system(&mut self.world, view);
        self.world.flush_destroyed();
        self.events.clear_all();
        None
    }
}

/// Queue removal of entities that wandered too far outside `view`.
pub fn offscreen_system(world: &mut World, view: Aabb) {
    let gone: Vec<_> = world
        .offscreens
        .iter()
        .filter_map(|(entity, offscreen)| {
            let margin = vec2(offscreen.distance, offscreen.distance);
            let keep = Aabb { min: view.min - margin, max: view.max + margin };
            let bounds = collider(world, entity)
                .or_else(|| world.position(entity).map(|p| Aabb::new(p, Vec2::ZERO)))?;
            let inside = bounds.max.x >= keep.min.x
                && bounds.min.x <= keep.max.x
                && bounds.max.y >= keep.min.y
                && bounds.min.y <= keep.max.y;
            (!inside).then_some(entity)
        })
        .collect();

    for entity in gone {
        log::trace!("{:?} left the screen", entity);
        world.destroy_later(entity);
    }
}
