// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use crate::model::ShadowModel;
use glam::{Mat4, Vec3, Vec4};
use rust_glint::{
    context::Context,
    game::Render,
    mesh::{import, CpuMesh},
    render::{
        gl::{
            framebuffer::GlFrameBuffer,
            mesh_object::{GlMeshObject, Material, TextureBinding},
            shader::{GlProgram, UniformValue},
            texture::{GlTexture, ImageData, ImageFormat},
        },
        scene::{DrawCall, PassTarget, RenderPass, Scene},
    },
};

pub struct ShadowRender {
    scene: Scene,
    depth: usize,
    phong: usize,
    bump: usize,
    teapot: usize,
    floor: usize,
    fbo: usize,
}

impl ShadowRender {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            depth: 0,
            phong: 0,
            bump: 0,
            teapot: 0,
            floor: 0,
            fbo: 0,
        }
    }
}

/// Maps clip space [-1, 1] into the [0, 1] range the depth texture lookup
/// expects.
fn bias_matrix() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 0.0),
        Vec4::new(0.5, 0.5, 0.5, 1.0),
    )
}

fn checker_image() -> ImageData {
    let size = 64u32;
    let cell = 8;
    let mut data = Vec::with_capacity((size * size * 3) as usize);
    for y in 0..size {
        for x in 0..size {
            let v = if ((x / cell) + (y / cell)) % 2 == 0 {
                200
            } else {
                90
            };
            data.extend_from_slice(&[v, v, v]);
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

impl Render for ShadowRender {
    type Model = ShadowModel;

    fn init(&mut self, ctx: &mut Context, m: &mut ShadowModel) -> Result<(), String> {
        let gl = ctx.adapter.gl();
        let (width, height) = (ctx.adapter.width, ctx.adapter.height);

        self.depth = self.scene.add_program(GlProgram::build(
            gl,
            "assets/shader/shadow/depth.vs",
            "assets/shader/shadow/depth.fs",
        )?);
        self.phong = self.scene.add_program(GlProgram::build(
            gl,
            "assets/shader/shadow/phong_shadow.vs",
            "assets/shader/shadow/phong_shadow.fs",
        )?);
        self.bump = self.scene.add_program(GlProgram::build(
            gl,
            "assets/shader/shadow/bump.vs",
            "assets/shader/shadow/bump.fs",
        )?);

        // double resolution depth map, as authored in the original scene
        let depth_texture = GlTexture::depth_target(gl, 2 * width, 2 * height)?;
        let checker = GlTexture::from_image(gl, &checker_image())?;

        let mut fbo = GlFrameBuffer::new(gl, 2 * width, 2 * height)?;
        fbo.bind(gl);
        fbo.attach_texture(gl, glow::DEPTH_ATTACHMENT, &depth_texture);
        // depth-only pass: no color writes at all
        fbo.select_draw_read_buffers(gl, None, glow::NONE);
        let status = fbo.status(gl);
        fbo.unbind(gl);
        status?;
        self.fbo = self.scene.add_framebuffer(fbo);

        let mut mesh = import::read_mesh_file(&m.mesh_path)?;
        mesh.compute_tangents();
        let mut teapot = GlMeshObject::build(gl, &mesh)?;
        teapot.material = Material {
            diffuse: Vec3::new(0.0, 1.0, 1.0),
            specular: Vec3::splat(0.8),
            shininess: 128.0,
        };
        teapot.transform = Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0));
        teapot.textures.push(TextureBinding {
            unit: 1,
            texture: checker.texture_ref(),
        });
        teapot.textures.push(TextureBinding {
            unit: 2,
            texture: depth_texture.texture_ref(),
        });
        self.teapot = self.scene.add_object(teapot);

        let mut floor = GlMeshObject::build(gl, &CpuMesh::cube())?;
        floor.material = Material {
            diffuse: Vec3::ONE,
            specular: Vec3::splat(0.8),
            shininess: 2.0,
        };
        floor.transform = Mat4::from_scale(Vec3::new(2.0, 0.05, 2.0));
        floor.textures.push(TextureBinding {
            unit: 2,
            texture: depth_texture.texture_ref(),
        });
        self.floor = self.scene.add_object(floor);

        let mut light_pass = RenderPass::new(PassTarget::Offscreen(self.fbo));
        light_pass.clear_color = None; // nothing to clear but depth
        self.scene.passes.push(light_pass);
        self.scene.passes.push(RenderPass::new(PassTarget::Screen));

        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context, m: &mut ShadowModel, _dt: f32) {
        let light_position = m.light_position();
        let light_view = Mat4::look_at_rh(light_position, Vec3::ZERO, Vec3::Z);
        let light_projection =
            Mat4::perspective_rh_gl(30.0_f32.to_radians(), m.aspect_ratio(), 0.5, 30.0);
        let light_pov = bias_matrix() * light_projection * light_view;

        let view = m.view_matrix();
        let light_eye = (view * light_position.extend(1.0)).truncate();

        let fb = &self.scene.framebuffers[self.fbo];
        let fb_viewport = (fb.width as i32, fb.height as i32);

        let light_pass = &mut self.scene.passes[0];
        light_pass.camera.projection = light_projection;
        light_pass.camera.view = light_view;
        light_pass.viewport = fb_viewport;
        light_pass.draws = vec![
            DrawCall::new(self.teapot, self.depth),
            DrawCall::new(self.floor, self.depth),
        ];

        let teapot_draw = if m.bump_enabled {
            DrawCall::new(self.teapot, self.bump)
                .uniform("light_position", UniformValue::Vec3(light_eye))
                .uniform("surface_color", UniformValue::Vec3(Vec3::new(0.7, 0.6, 0.18)))
                .uniform("bump_density", UniformValue::Float(16.0))
                .uniform("bump_size", UniformValue::Float(0.15))
                .uniform("specular_factor", UniformValue::Float(0.5))
        } else {
            DrawCall::new(self.teapot, self.phong)
                .uniform("light_position", UniformValue::Vec3(light_eye))
                .uniform("light_pov_matrix", UniformValue::Mat4(light_pov))
                .uniform("texture1", UniformValue::Int(1))
                .uniform("texture2", UniformValue::Int(2))
                .uniform("use_texture", UniformValue::Int(1))
        };

        let screen_pass = &mut self.scene.passes[1];
        screen_pass.camera.projection = m.projection_matrix();
        screen_pass.camera.view = view;
        screen_pass.viewport = (ctx.adapter.width as i32, ctx.adapter.height as i32);
        screen_pass.draws = vec![
            teapot_draw,
            DrawCall::new(self.floor, self.phong)
                .uniform("light_position", UniformValue::Vec3(light_eye))
                .uniform("light_pov_matrix", UniformValue::Mat4(light_pov))
                .uniform("texture2", UniformValue::Int(2))
                .uniform("use_texture", UniformValue::Int(0)),
        ];

        self.scene.render_frame(ctx.adapter.gl());
    }
}
