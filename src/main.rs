//! Mario-style platformer demo
//!
//! A one-level side scroller: walk, jump, stomp shrooms, bump boxes for coins
//! and mushrooms. Built on macroquad with a small ECS-style game layer.
//!
//! Usage:
//!   mario-demo                      # stock level, `mario.ron` if present
//!   mario-demo --level my.ron       # custom level file
//!   mario-demo --dump-config        # print the default tuning as RON

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod assets;
mod config;
mod game;
mod input;
mod level;
mod scene;

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;

use assets::SpriteAtlas;
use config::GameConfig;
use input::InputState;
use level::LevelDef;
use scene::{SceneArgs, SceneName, SceneRegistry};

const WINDOW_WIDTH: i32 = 800;
const WINDOW_HEIGHT: i32 = 600;

/// Longest frame the simulation will step. A stall plays back as one slow
/// frame instead of a single oversized physics step.
const MAX_FRAME_TIME: f32 = 1.0 / 20.0;

#[derive(Parser, Debug)]
#[command(name = "mario-demo", version = VERSION)]
#[command(about = "Mario-style platformer demo")]
struct Cli {
    /// Tuning overrides (RON). Defaults to ./mario.ron when present
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level file (RON) to play instead of the built-in level
    #[arg(long)]
    level: Option<PathBuf>,
    /// Print the effective config as RON and exit
    #[arg(long)]
    dump_config: bool,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Mario Demo v{}", VERSION),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        // Initialize crash logging FIRST (before any other code)
        crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
}

/// Bad config falls back to defaults; the game is still playable.
fn load_config(cli: &Cli) -> GameConfig {
    match GameConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}; using default config", e);
            GameConfig::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging();

    #[cfg(not(target_arch = "wasm32"))]
    let cli = Cli::parse();
    #[cfg(target_arch = "wasm32")]
    let cli = Cli { config: None, level: None, dump_config: false };

    let config = load_config(&cli);

    if cli.dump_config {
        match config.to_ron() {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("{}", e),
        }
        return;
    }

    let level = match &cli.level {
        Some(path) => match level::load_level(path) {
            Ok(level) => level,
            Err(e) => {
                log::error!("cannot load level {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LevelDef::default(),
    };

    let atlas = SpriteAtlas::load(&config.sprite_root).await;

    let mut scenes = SceneRegistry::standard(&config, &level, WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32);
    if let Err(e) = scenes.go(SceneName::Game, SceneArgs::default()) {
        log::error!("{}", e);
        return;
    }

    let mut input = InputState::new();
    if input.has_gamepad() {
        log::info!("gamepad connected");
    }
    log::info!("=== Mario Demo v{} ===", VERSION);

    loop {
        input.poll();
        let frame = input.snapshot();
        let dt = get_frame_time().min(MAX_FRAME_TIME);

        if let Err(e) = scenes.update(&frame, dt) {
            log::error!("{}", e);
            break;
        }

        clear_background(BLACK);
        scenes.draw(&atlas);

        next_frame().await;
    }
}
