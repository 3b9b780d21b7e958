// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Game encapsulates Model and Render classes and implements the main loop.
//! Be aware that all the Game, Model and Render instances have the same
//! lifetime.
//!
//! # Example
//!
//! fn main() {
//!    let m = TeapotModel::new("assets/mesh/teapot.ctm");
//!    let r = TeapotRender::new();
//!    let mut g = Game::new(m, r, "teapot", "Spinning Teapot", 640, 480);
//!    if let Err(e) = g.init().and_then(|_| g.run()) {
//!        error!("{}", e);
//!        std::process::exit(1);
//!    }
//! }

use crate::{
    context::Context,
    event::{Event, KeyCode, KeyEventKind},
    log::init_log,
};
use log::info;
use std::time::{Duration, Instant};

/// The Model interface, main entrance for data and core logic.
/// Setup errors returned from init are setup-fatal: the caller logs them
/// and exits with a failure status, there is no retry.
pub trait Model {
    fn init(&mut self, ctx: &mut Context) -> Result<(), String>;
    fn update(&mut self, ctx: &mut Context, dt: f32) {
        self.handle_input(ctx, dt);
        self.handle_auto(ctx, dt);
    }
    /// react to the input events collected this frame
    fn handle_input(&mut self, ctx: &mut Context, dt: f32);
    /// per-frame state updates that do not depend on input
    fn handle_auto(&mut self, ctx: &mut Context, dt: f32);
}

/// The Render interface, takes context and model as input params.
/// It renders every single frame.
pub trait Render {
    type Model: Model;

    fn init(&mut self, ctx: &mut Context, m: &mut Self::Model) -> Result<(), String>;
    fn update(&mut self, ctx: &mut Context, m: &mut Self::Model, dt: f32) {
        self.draw(ctx, m, dt);
    }
    fn draw(&mut self, ctx: &mut Context, m: &mut Self::Model, dt: f32);
}

/// Game encapsulates a Model, a Render and a Context structure
pub struct Game<M, R>
where
    M: Model,
    R: Render<Model = M>,
{
    pub context: Context,
    pub model: M,
    pub render: R,
}

impl<M, R> Game<M, R>
where
    M: Model,
    R: Render<Model = M>,
{
    pub fn new(m: M, r: R, name: &str, title: &str, width: u32, height: u32) -> Self {
        init_log(
            log::LevelFilter::Info,
            &format!("log{}{}.log", std::path::MAIN_SEPARATOR, name),
        );
        info!("{}(rust_glint) start...", name);
        Self {
            context: Context::new(name, title, width, height),
            model: m,
            render: r,
        }
    }

    /// Opens the window and GL context, then initializes model and render.
    /// All GPU resources are created here, before the frame loop starts.
    pub fn init(&mut self) -> Result<(), String> {
        info!("Init game...");
        self.context.adapter.open()?;
        self.model.init(&mut self.context)?;
        self.render.init(&mut self.context, &mut self.model)?;
        Ok(())
    }

    /// Main loop: poll input events, update model and render, swap buffers.
    /// The swap blocks on vsync, which paces the whole loop. The exit
    /// condition (escape key or window closed) is checked once per frame.
    pub fn run(&mut self) -> Result<(), String> {
        info!("Begin run...");

        let mut last_tick = Instant::now();
        loop {
            if self
                .context
                .adapter
                .poll_event(Duration::from_millis(1), &mut self.context.input_events)
            {
                return Ok(());
            }
            if self.escape_pressed() {
                return Ok(());
            }

            let et = last_tick.elapsed();
            last_tick = Instant::now();
            self.on_tick(et.as_secs_f32());

            self.context.input_events.clear();
            self.context.adapter.swap_buffers();
        }
    }

    /// calls every frame, updates model logic and does rendering
    pub fn on_tick(&mut self, dt: f32) {
        self.context.stage += 1;
        self.model.update(&mut self.context, dt);
        self.render.update(&mut self.context, &mut self.model, dt);
    }

    fn escape_pressed(&self) -> bool {
        self.context.input_events.iter().any(|e| {
            matches!(
                e,
                Event::Key(k) if k.code == KeyCode::Esc && k.kind == KeyEventKind::Press
            )
        })
    }
}
