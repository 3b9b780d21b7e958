// RustGlint
// copyright zipxing@hotmail.com 2022~2024

mod model;
mod render;

use clap::Parser;
use log::error;
use model::TeapotModel;
use render::TeapotRender;
use rust_glint::game::Game;

/// Spinning teapot: one phong pass with a checker texture and a cube
/// floor. Drag to rotate the view, shift-drag to zoom, escape to quit.
#[derive(Parser)]
#[command(name = "teapot")]
struct Args {
    /// mesh file to load
    #[arg(default_value = "assets/mesh/teapot.ctm")]
    mesh: String,
}

fn main() {
    let args = Args::parse();
    let m = TeapotModel::new(&args.mesh);
    let r = TeapotRender::new();
    let mut g = Game::new(m, r, "teapot", "Spinning Teapot", 640, 480);
    if let Err(e) = g.init().and_then(|_| g.run()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
