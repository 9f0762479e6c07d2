//! Build automation tasks for the Mario demo
//!
//! Usage:
//!   cargo xtask build-web       # Build WASM for web deployment
//!   cargo xtask package         # Native release + sprites in dist/native
//!   cargo xtask gen-sprites     # Write placeholder PNGs into sprites/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::process::Command;

const BIN_NAME: &str = "mario-demo";

/// Every sprite the game loads: file stem, size, fill colour.
const SPRITES: [(&str, u32, u32, [u8; 3]); 12] = [
    ("block", 20, 20, [200, 120, 60]),
    ("brick", 20, 20, [170, 70, 30]),
    ("coin", 20, 20, [255, 203, 0]),
    ("question", 20, 20, [240, 180, 40]),
    ("unboxed", 20, 20, [120, 80, 50]),
    ("pipe-left", 40, 40, [40, 170, 60]),
    ("pipe-right", 40, 40, [40, 170, 60]),
    ("pipe-top-left-side", 40, 40, [40, 170, 60]),
    ("pipe-top-right-side", 40, 40, [40, 170, 60]),
    ("evil-shroom-1", 20, 20, [150, 60, 20]),
    ("mushroom", 20, 20, [230, 40, 40]),
    ("mario-standing", 20, 20, [220, 30, 30]),
];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the Mario demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build WASM for web deployment
    BuildWeb,
    /// Build a native release with its sprites into dist/native
    Package,
    /// Write placeholder sprites (overwrites existing files only with --force)
    GenSprites {
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildWeb => build_web(),
        Commands::Package => package(),
        Commands::GenSprites { force } => gen_sprites(force),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Download a file from URL to destination
fn download_file(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {}...", url);
    run_cmd(Command::new("curl").args(["-L", "-o"]).arg(dest).arg(url))
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Recreate an output folder
fn fresh_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

fn copy_sprites(root: &Path, dist: &Path) -> Result<()> {
    let sprites = root.join("sprites");
    if !sprites.exists() {
        gen_sprites(false)?;
    }
    copy_dir_recursive(&sprites, &dist.join("sprites"))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Mario Demo</title>
<style>html, body, canvas { margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; background: black; }</style>
</head>
<body>
<canvas id="glcanvas" tabindex="1"></canvas>
<script src="mq_js_bundle.js"></script>
<script>load("mario-demo.wasm");</script>
</body>
</html>
"#;

/// Build WASM for web deployment
fn build_web() -> Result<()> {
    let root = project_root()?;
    let dist = root.join("dist/web");

    println!("Building WASM...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--target", "wasm32-unknown-unknown", "--bin", BIN_NAME]),
    )?;

    fresh_dir(&dist)?;

    println!("Copying files to dist/web...");
    let wasm = format!("{}.wasm", BIN_NAME);
    std::fs::copy(root.join("target/wasm32-unknown-unknown/release").join(&wasm), dist.join(&wasm))
        .context("WASM binary missing after build")?;
    std::fs::write(dist.join("index.html"), INDEX_HTML)?;

    // Download macroquad JS bundle
    download_file(
        "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js",
        &dist.join("mq_js_bundle.js"),
    )?;

    copy_sprites(&root, &dist)?;

    println!("Web build complete: dist/web/");
    Ok(())
}

/// Build a native release next to its sprites
fn package() -> Result<()> {
    let root = project_root()?;
    let dist = root.join("dist/native");

    println!("Building native release...");
    run_cmd(Command::new("cargo").current_dir(&root).args(["build", "--release", "--bin", BIN_NAME]))?;

    fresh_dir(&dist)?;

    let binary = if cfg!(target_os = "windows") {
        format!("{}.exe", BIN_NAME)
    } else {
        BIN_NAME.to_string()
    };
    std::fs::copy(root.join("target/release").join(&binary), dist.join(&binary))
        .context("release binary missing after build")?;

    copy_sprites(&root, &dist)?;

    println!("Native package ready: dist/native/");
    Ok(())
}

/// Flat tile with a darker one-pixel border, enough to tell tiles apart.
fn placeholder(width: u32, height: u32, [r, g, b]: [u8; 3]) -> RgbaImage {
    let fill = Rgba([r, g, b, 255]);
    let edge = Rgba([r / 2, g / 2, b / 2, 255]);
    RgbaImage::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
            edge
        } else {
            fill
        }
    })
}

/// Write placeholder sprites into sprites/
fn gen_sprites(force: bool) -> Result<()> {
    let dir = project_root()?.join("sprites");
    std::fs::create_dir_all(&dir)?;

    let mut written = 0;
    for (name, width, height, color) in SPRITES {
        let path = dir.join(format!("{}.png", name));
        if path.exists() && !force {
            continue;
        }
        placeholder(width, height, color)
            .save(&path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        written += 1;
    }

    println!("Wrote {} sprites to {}", written, dir.display());
    Ok(())
}
