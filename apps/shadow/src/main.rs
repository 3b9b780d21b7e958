// RustGlint
// copyright zipxing@hotmail.com 2022~2024

mod model;
mod render;

use clap::Parser;
use log::error;
use model::ShadowModel;
use render::ShadowRender;
use rust_glint::game::Game;

/// Shadow mapped teapot over a floor slab. The first pass renders depth
/// from the light's viewpoint into an offscreen target, the second shades
/// with that map. Space toggles the procedural bump shader, 'l' switches
/// the trackball between camera and light, shift-drag zooms.
#[derive(Parser)]
#[command(name = "shadow")]
struct Args {
    /// mesh file to load
    #[arg(default_value = "assets/mesh/teapot.ctm")]
    mesh: String,
}

fn main() {
    let args = Args::parse();
    let m = ShadowModel::new(&args.mesh);
    let r = ShadowRender::new();
    let mut g = Game::new(m, r, "shadow", "Teapot Shadow", 640, 480);
    if let Err(e) = g.init().and_then(|_| g.run()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
