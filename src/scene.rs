//! Scene flow
//!
//! Two scenes, `game` and `gameover`. Every transition tears the current
//! scene down and rebuilds the target from scratch, so nothing (score
//! included) survives a restart.
//!
//! ```text
//! game ──(death / fall)──▶ gameover ──(r)──▶ game
//!   └───────────(r)───────────▶ game
//! ```

use std::collections::HashMap;

use macroquad::prelude::{vec2, Vec2};
use thiserror::Error;

use crate::assets::SpriteAtlas;
use crate::config::GameConfig;
use crate::game::renderer::{draw_centered_text, draw_session};
use crate::game::{LevelSession, SessionEvent};
use crate::input::FrameInput;
use crate::level::LevelDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneName {
    Game,
    GameOver,
}

impl SceneName {
    pub fn label(&self) -> &'static str {
        match self {
            SceneName::Game => "game",
            SceneName::GameOver => "gameover",
        }
    }
}

/// Data handed to a scene when it is entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneArgs {
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: SceneName,
    pub args: SceneArgs,
}

impl Transition {
    pub fn to(to: SceneName) -> Self {
        Self { to, args: SceneArgs::default() }
    }

    pub fn game_over(score: u32) -> Self {
        Self { to: SceneName::GameOver, args: SceneArgs { score: Some(score) } }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene '{0}' is not registered")]
    Unregistered(&'static str),
}

pub trait Scene {
    /// Build the scene's contents.
    fn activate(&mut self, args: SceneArgs);
    fn update(&mut self, input: &FrameInput, dt: f32) -> Option<Transition>;
    fn draw(&self, atlas: &SpriteAtlas);
    /// Drop everything the scene built.
    fn teardown(&mut self);
}

pub fn game_over_text(score: u32) -> String {
    format!("Game Over!\nYour score: {}\nRestart? [r]", score)
}

// =============================================================================
// Scenes
// =============================================================================

pub struct GameScene {
    config: GameConfig,
    level: LevelDef,
    screen: Vec2,
    session: Option<LevelSession>,
}

impl GameScene {
    pub fn new(config: GameConfig, level: LevelDef, screen: Vec2) -> Self {
        Self { config, level, screen, session: None }
    }

    pub fn session(&self) -> Option<&LevelSession> {
        self.session.as_ref()
    }
}

impl Scene for GameScene {
    fn activate(&mut self, _args: SceneArgs) {
        self.session = Some(LevelSession::new(&self.config, &self.level, self.screen));
    }

    fn update(&mut self, input: &FrameInput, dt: f32) -> Option<Transition> {
        match self.session.as_mut()?.tick(input, dt)? {
            SessionEvent::Restart => Some(Transition::to(SceneName::Game)),
            SessionEvent::GameOver { score } => Some(Transition::game_over(score)),
        }
    }

    fn draw(&self, atlas: &SpriteAtlas) {
        if let Some(session) = &self.session {
            draw_session(session, atlas);
        }
    }

    fn teardown(&mut self) {
        self.session = None;
    }
}

pub struct GameOverScene {
    text: String,
    text_size: f32,
}

impl GameOverScene {
    pub fn new(text_size: f32) -> Self {
        Self { text: String::new(), text_size }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Scene for GameOverScene {
    fn activate(&mut self, args: SceneArgs) {
        self.text = game_over_text(args.score.unwrap_or(0));
    }

    fn update(&mut self, input: &FrameInput, _dt: f32) -> Option<Transition> {
        input.restart.then(|| Transition::to(SceneName::Game))
    }

    fn draw(&self, _atlas: &SpriteAtlas) {
        draw_centered_text(&self.text, self.text_size);
    }

    fn teardown(&mut self) {
        self.text.clear();
    }
}

// =============================================================================
// Registry
// =============================================================================

pub struct SceneRegistry {
    scenes: HashMap<SceneName, Box<dyn Scene>>,
    active: Option<SceneName>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self { scenes: HashMap::new(), active: None }
    }

    /// The stock pair of scenes for a level.
    pub fn standard(config: &GameConfig, level: &LevelDef, screen_width: f32, screen_height: f32) -> Self {
        let mut registry = Self::new();
        registry.register(
            SceneName::Game,
            Box::new(GameScene::new(config.clone(), level.clone(), vec2(screen_width, screen_height))),
        );
        registry.register(SceneName::GameOver, Box::new(GameOverScene::new(config.hud_text_size * 2.0)));
        registry
    }

    pub fn register(&mut self, name: SceneName, scene: Box<dyn Scene>) {
        self.scenes.insert(name, scene);
    }

    pub fn active(&self) -> Option<SceneName> {
        self.active
    }

    /// Tear down the active scene and enter `name`.
    pub fn go(&mut self, name: SceneName, args: SceneArgs) -> Result<(), SceneError> {
        if !self.scenes.contains_key(&name) {
            return Err(SceneError::Unregistered(name.label()));
        }

        if let Some(current) = self.active.take() {
            if let Some(scene) = self.scenes.get_mut(&current) {
                scene.teardown();
            }
        }

        log::info!("entering scene '{}'", name.label());
        if let Some(scene) = self.scenes.get_mut(&name) {
            scene.activate(args);
        }
        self.active = Some(name);
        Ok(())
    }

    /// Run one frame of the active scene, following any transition it asks for.
    pub fn update(&mut self, input: &FrameInput, dt: f32) -> Result<(), SceneError> {
        let Some(active) = self.active() else { return Ok(()) };
        let transition = self.scenes.get_mut(&active).and_then(|scene| scene.update(input, dt));

        match transition {
            Some(t) => self.go(t.to, t.args),
            None => Ok(()),
        }
    }

    pub fn draw(&self, atlas: &SpriteAtlas) {
        if let Some(scene) = self.active().and_then(|name| self.scenes.get(&name)) {
            scene.draw(atlas);
        }
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::Tag;

    const DT: f32 = 1.0 / 60.0;

    /// Records what the registry does to it.
    struct Recorder {
        log: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl Scene for Recorder {
        fn activate(&mut self, args: SceneArgs) {
            self.log.borrow_mut().push(format!("activate {:?}", args.score));
        }
        fn update(&mut self, input: &FrameInput, _dt: f32) -> Option<Transition> {
            input.restart.then(|| Transition::game_over(7))
        }
        fn draw(&self, _atlas: &SpriteAtlas) {}
        fn teardown(&mut self) {
            self.log.borrow_mut().push("teardown".into());
        }
    }

    #[test]
    fn test_game_over_text() {
        assert_eq!(game_over_text(30), "Game Over!\nYour score: 30\nRestart? [r]");
    }

    #[test]
    fn test_go_to_unregistered_scene_fails() {
        let mut registry = SceneRegistry::new();
        assert_eq!(
            registry.go(SceneName::GameOver, SceneArgs::default()),
            Err(SceneError::Unregistered("gameover"))
        );
        assert_eq!(registry.active(), None);
    }

    #[test]
    fn test_transition_tears_down_before_activating() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut registry = SceneRegistry::new();
        registry.register(SceneName::Game, Box::new(Recorder { log: log.clone() }));
        registry.register(SceneName::GameOver, Box::new(Recorder { log: log.clone() }));

        registry.go(SceneName::Game, SceneArgs::default()).unwrap();
        registry.update(&FrameInput::restart(), DT).unwrap();

        assert_eq!(registry.active(), Some(SceneName::GameOver));
        assert_eq!(*log.borrow(), vec!["activate None", "teardown", "activate Some(7)"]);
    }

    #[test]
    fn test_game_over_restarts_game() {
        let mut scene = GameOverScene::new(28.0);
        scene.activate(SceneArgs { score: Some(40) });
        assert_eq!(scene.text(), "Game Over!\nYour score: 40\nRestart? [r]");

        assert_eq!(scene.update(&FrameInput::default(), DT), None);
        assert_eq!(scene.update(&FrameInput::restart(), DT), Some(Transition::to(SceneName::Game)));
    }

    #[test]
    fn test_restart_resets_score() {
        let config = GameConfig::default();
        let level = LevelDef::default();
        let mut game = GameScene::new(config, level, vec2(800.0, 600.0));
        game.activate(SceneArgs::default());

        let session = game.session.as_mut().unwrap();
        let hud = *session.hud();
        hud.add_score(&mut session.world, 50);
        assert_eq!(session.score(), 50);

        assert_eq!(game.update(&FrameInput::restart(), DT), Some(Transition::to(SceneName::Game)));
        game.teardown();
        assert!(game.session().is_none());
        game.activate(SceneArgs::default());
        assert_eq!(game.session().unwrap().score(), 0);
    }

    #[test]
    fn test_fall_carries_score_into_game_over() {
        let config = GameConfig::default();
        let level = LevelDef { name: "Pit".into(), rows: vec!["   ".into()] };
        let mut registry = SceneRegistry::standard(&config, &level, 800.0, 600.0);
        registry.go(SceneName::Game, SceneArgs::default()).unwrap();

        for _ in 0..600 {
            registry.update(&FrameInput::default(), DT).unwrap();
            if registry.active() == Some(SceneName::GameOver) {
                break;
            }
        }
        assert_eq!(registry.active(), Some(SceneName::GameOver));

        registry.update(&FrameInput::restart(), DT).unwrap();
        assert_eq!(registry.active(), Some(SceneName::Game));
    }

    #[test]
    fn test_fall_hands_score_to_game_over_and_restart_zeroes_it() {
        let level = LevelDef { name: "Pit".into(), rows: vec!["   ".into()] };
        let mut game = GameScene::new(GameConfig::default(), level, vec2(800.0, 600.0));
        let mut over = GameOverScene::new(28.0);
        game.activate(SceneArgs::default());
        let session = game.session.as_mut().unwrap();
        let hud = *session.hud();
        hud.add_score(&mut session.world, 30);

        let transition = (0..600).find_map(|_| game.update(&FrameInput::default(), DT)).unwrap();
        assert_eq!(transition, Transition::game_over(30));
        assert_eq!(transition.args.score, Some(30));

        game.teardown();
        over.activate(transition.args);
        assert_eq!(over.text(), game_over_text(30));

        let back = over.update(&FrameInput::restart(), DT).unwrap();
        assert_eq!(back.to, SceneName::Game);
        over.teardown();
        game.activate(back.args);
        assert_eq!(game.session().unwrap().score(), 0);
    }

    #[test]
    fn test_game_scene_builds_level() {
        let mut game = GameScene::new(GameConfig::default(), LevelDef::default(), vec2(800.0, 600.0));
        assert!(game.session().is_none());
        game.activate(SceneArgs::default());

        let world = &game.session().unwrap().world;
        assert_eq!(world.with_tag(Tag::Hostile).len(), 2);
        assert_eq!(world.with_tag(Tag::Player).len(), 1);
        assert_eq!(world.with_tag(Tag::Box).len(), 3);
    }
}
