// RustGlint
// copyright zipxing@hotmail.com 2022~2024

mod model;
mod render;

use clap::Parser;
use log::error;
use model::ReflectionModel;
use render::ReflectionRender;
use rust_glint::game::Game;

/// Planar reflection: the teapot is rendered into an offscreen color
/// target through a mirrored camera, then the board blends that texture
/// in by fresnel weight. Drag rotates the teapot, shift-drag zooms.
#[derive(Parser)]
#[command(name = "reflection")]
struct Args {
    /// mesh file to load
    #[arg(default_value = "assets/mesh/teapot.ctm")]
    mesh: String,
}

fn main() {
    let args = Args::parse();
    let m = ReflectionModel::new(&args.mesh);
    let r = ReflectionRender::new();
    let mut g = Game::new(m, r, "reflection", "Teapot Reflection", 640, 480);
    if let Err(e) = g.init().and_then(|_| g.run()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
