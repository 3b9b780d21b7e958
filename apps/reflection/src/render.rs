// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use crate::model::ReflectionModel;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use rust_glint::{
    context::Context,
    game::Render,
    mesh::{import, CpuMesh},
    render::{
        gl::{
            framebuffer::GlFrameBuffer,
            mesh_object::{GlMeshObject, Material},
            shader::{GlProgram, UniformValue},
            texture::{
                texture_unit_attach, texture_units_init, GlTexture, ImageData, ImageFormat,
            },
        },
        scene::{DrawCall, PassTarget, RenderPass, Scene},
    },
};
use std::f32::consts::FRAC_PI_2;

pub struct ReflectionRender {
    scene: Scene,
    diffuse: usize,
    mirror: usize,
    teapot: usize,
    board: usize,
    fbo: usize,
}

impl ReflectionRender {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            diffuse: 0,
            mirror: 0,
            teapot: 0,
            board: 0,
            fbo: 0,
        }
    }
}

/// Householder reflection across the plane with normal n at distance d.
fn mirror_matrix(n: Vec3, d: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.y * n.x, -2.0 * n.z * n.x, 0.0),
        Vec4::new(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.z * n.y, 0.0),
        Vec4::new(-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z, 0.0),
        Vec4::new(-2.0 * n.x * d, -2.0 * n.y * d, -2.0 * n.z * d, 1.0),
    )
}

fn board_image() -> ImageData {
    let size = 64u32;
    let mut data = Vec::with_capacity((size * size * 3) as usize);
    for y in 0..size {
        for x in 0..size {
            let grain = ((x + y / 3) / 8) % 2 == 0;
            if grain {
                data.extend_from_slice(&[140, 90, 40]);
            } else {
                data.extend_from_slice(&[110, 70, 30]);
            }
        }
    }
    ImageData {
        width: size,
        height: size,
        byte_depth: 3,
        format: ImageFormat::Rgb,
        data,
    }
}

impl Render for ReflectionRender {
    type Model = ReflectionModel;

    fn init(&mut self, ctx: &mut Context, m: &mut ReflectionModel) -> Result<(), String> {
        let gl = ctx.adapter.gl();
        let (width, height) = (ctx.adapter.width, ctx.adapter.height);

        self.diffuse = self.scene.add_program(GlProgram::build(
            gl,
            "assets/shader/reflection/diffuse.vs",
            "assets/shader/reflection/diffuse.fs",
        )?);
        self.mirror = self.scene.add_program(GlProgram::build(
            gl,
            "assets/shader/reflection/mirror.vs",
            "assets/shader/reflection/mirror.fs",
        )?);

        // unit 0 samples the reflection pass output, unit 1 the board grain
        let color = GlTexture::color_target(gl, width, height)?;
        let grain = GlTexture::from_image(gl, &board_image())?;
        texture_units_init(4);
        texture_unit_attach(0, color.texture_ref());
        texture_unit_attach(1, grain.texture_ref());

        let mut fbo = GlFrameBuffer::new(gl, width, height)?;
        fbo.bind(gl);
        fbo.attach_texture(gl, glow::COLOR_ATTACHMENT0, &color);
        fbo.attach_render_buffer(gl, glow::DEPTH_ATTACHMENT, glow::DEPTH_COMPONENT16)?;
        fbo.select_draw_read_buffers(gl, Some(&[glow::COLOR_ATTACHMENT0]), glow::NONE);
        let status = fbo.status(gl);
        fbo.unbind(gl);
        status?;
        self.fbo = self.scene.add_framebuffer(fbo);

        let mesh = import::read_mesh_file(&m.mesh_path)?;
        let mut teapot = GlMeshObject::build(gl, &mesh)?;
        teapot.material = Material {
            diffuse: Vec3::new(0.3, 0.8, 0.9),
            specular: Vec3::splat(0.8),
            shininess: 64.0,
        };
        self.teapot = self.scene.add_object(teapot);

        let mut plane = CpuMesh::plane();
        plane.tex_coords = vec![
            0.0, 0.0, //
            1.0, 0.0, //
            0.0, 1.0, //
            1.0, 1.0,
        ];
        let mut board = GlMeshObject::build(gl, &plane)?;
        // unit plane faces +z; center it, widen it and lay it into y = 0
        board.transform = Mat4::from_rotation_x(-FRAC_PI_2)
            * Mat4::from_scale(Vec3::new(3.0, 3.0, 1.0))
            * Mat4::from_translation(Vec3::new(-0.5, -0.5, 0.0));
        self.board = self.scene.add_object(board);

        let mut offscreen = RenderPass::new(PassTarget::Offscreen(self.fbo));
        offscreen.front_face = glow::CW; // mirrored geometry flips winding
        self.scene.passes.push(offscreen);
        self.scene.passes.push(RenderPass::new(PassTarget::Screen));

        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context, m: &mut ReflectionModel, _dt: f32) {
        let projection = m.projection_matrix();
        let view = m.view_matrix();
        let mirrored_view = view * mirror_matrix(Vec3::Y, 0.0);
        let light_direction = Vec3::new(0.0, -1.0, 0.0);

        self.scene.objects[self.teapot].transform =
            Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0)) * Mat4::from_quat(m.orientation);

        let fb = &self.scene.framebuffers[self.fbo];
        let fb_viewport = (fb.width as i32, fb.height as i32);

        let offscreen = &mut self.scene.passes[0];
        offscreen.camera.projection = projection;
        offscreen.camera.view = mirrored_view;
        offscreen.viewport = fb_viewport;
        offscreen.draws = vec![DrawCall::new(self.teapot, self.diffuse).uniform(
            "light_direction",
            UniformValue::Vec3(Mat3::from_mat4(mirrored_view) * light_direction),
        )];

        let screen = &mut self.scene.passes[1];
        screen.camera.projection = projection;
        screen.camera.view = view;
        screen.viewport = (ctx.adapter.width as i32, ctx.adapter.height as i32);
        screen.draws = vec![
            DrawCall::new(self.teapot, self.diffuse).uniform(
                "light_direction",
                UniformValue::Vec3(Mat3::from_mat4(view) * light_direction),
            ),
            DrawCall::new(self.board, self.mirror)
                .uniform("R0", UniformValue::Float(0.08))
                .uniform(
                    "viewport",
                    UniformValue::Vec2(Vec2::new(
                        ctx.adapter.width as f32,
                        ctx.adapter.height as f32,
                    )),
                )
                .uniform("texture0", UniformValue::Int(0))
                .uniform("texture1", UniformValue::Int(1)),
        ];

        self.scene.render_frame(ctx.adapter.gl());
    }
}
