// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use glam::{Mat4, Quat, Vec3};
use rust_glint::{
    context::Context,
    event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind},
    game::Model,
    util::Trackball,
};

pub struct TeapotModel {
    pub mesh_path: String,
    pub trackball: Trackball,
    pub orientation: Quat,
    pub fovy: f32,
    pub camera_zoom: bool,
    pub screen: (u32, u32),
}

impl TeapotModel {
    pub fn new(mesh_path: &str) -> Self {
        Self {
            mesh_path: mesh_path.to_string(),
            trackball: Trackball::new(150.0),
            orientation: Quat::IDENTITY,
            fovy: 30.0,
            camera_zoom: false,
            screen: (640, 480),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.screen.0 as f32 / self.screen.1.max(1) as f32
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy.to_radians(), self.aspect_ratio(), 1.0, 30.0)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            * Mat4::from_quat(self.orientation)
    }
}

impl Model for TeapotModel {
    fn init(&mut self, ctx: &mut Context) -> Result<(), String> {
        self.screen = (ctx.adapter.width, ctx.adapter.height);
        self.trackball
            .set_center(0.5 * self.screen.0 as f32, 0.5 * self.screen.1 as f32);
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut Context, _dt: f32) {
        for event in &ctx.input_events {
            match event {
                Event::Key(k) => match (k.code, k.kind) {
                    (KeyCode::Shift, KeyEventKind::Press) => self.camera_zoom = true,
                    (KeyCode::Shift, KeyEventKind::Release) => self.camera_zoom = false,
                    _ => {}
                },
                Event::Mouse(m) => {
                    let (x, y) = (m.x as f32, m.y as f32);
                    match m.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            self.trackball.drag_start(x, y)
                        }
                        MouseEventKind::Up(MouseButton::Left) => self.trackball.drag_end(),
                        MouseEventKind::Moved => {
                            if self.trackball.dragged() {
                                if self.camera_zoom {
                                    let theta =
                                        (0.5 * self.trackball.direction(x, y).y).clamp(-0.5, 0.5);
                                    self.fovy = (self.fovy + theta).clamp(5.0, 60.0);
                                } else {
                                    self.orientation =
                                        self.trackball.rotate(self.orientation, x, y);
                                }
                                self.trackball.drag_update(x, y);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resized(w, h) => {
                    self.screen = (*w, *h);
                    self.trackball.set_center(0.5 * *w as f32, 0.5 * *h as f32);
                }
            }
        }
    }

    fn handle_auto(&mut self, _ctx: &mut Context, _dt: f32) {}
}
