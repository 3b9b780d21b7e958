// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use crate::model::TeapotModel;
use glam::{Mat4, Vec3};
use rust_glint::{
    context::Context,
    game::Render,
    mesh::{import, CpuMesh},
    render::{
        gl::{
            mesh_object::{GlMeshObject, Material, TextureBinding},
            shader::{GlProgram, UniformValue},
            texture::{GlTexture, ImageData, ImageFormat},
        },
        scene::{DrawCall, PassTarget, RenderPass, Scene},
    },
};

pub struct TeapotRender {
    scene: Scene,
    phong: usize,
    teapot: usize,
    floor: usize,
}

impl TeapotRender {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            phong: 0,
            teapot: 0,
            floor: 0,
        }
    }
}

fn checker_image() -> ImageData {
    let size = 64u32;
    let cell = 8;
    let mut data = Vec::with_capacity((size * size * 3) as usize);
    for y in 0..size {
        for x in 0..size {
            let v = if ((x / cell) + (y / cell)) % 2 == 0 {
                230
            } else {
                60
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

impl Render for TeapotRender {
    type Model = TeapotModel;

    fn init(&mut self, ctx: &mut Context, m: &mut TeapotModel) -> Result<(), String> {
        let gl = ctx.adapter.gl();

        self.phong = self.scene.add_program(GlProgram::build(
            gl,
            "assets/shader/teapot/phong.vs",
            "assets/shader/teapot/phong.fs",
        )?);

        let checker = GlTexture::from_image(gl, &checker_image())?;

        let mesh = import::read_mesh_file(&m.mesh_path)?;
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
        self.teapot = self.scene.add_object(teapot);

        let mut floor = GlMeshObject::build(gl, &CpuMesh::cube())?;
        floor.material = Material {
            diffuse: Vec3::ONE,
            specular: Vec3::splat(0.8),
            shininess: 2.0,
        };
        floor.transform = Mat4::from_scale(Vec3::new(2.0, 0.05, 2.0));
        self.floor = self.scene.add_object(floor);

        let mut pass = RenderPass::new(PassTarget::Screen);
        pass.clear_color = Some([0.5, 0.5, 0.5, 1.0]);
        self.scene.passes.push(pass);

        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context, m: &mut TeapotModel, _dt: f32) {
        let view = m.view_matrix();
        let light_eye = (view * Vec3::new(0.0, 3.0, 3.0).extend(1.0)).truncate();

        let pass = &mut self.scene.passes[0];
        pass.camera.projection = m.projection_matrix();
        pass.camera.view = view;
        pass.viewport = (ctx.adapter.width as i32, ctx.adapter.height as i32);
        pass.draws = vec![
            DrawCall::new(self.teapot, self.phong)
                .uniform("light_position", UniformValue::Vec3(light_eye))
                .uniform("texture0", UniformValue::Int(1))
                .uniform("use_texture", UniformValue::Int(1)),
            DrawCall::new(self.floor, self.phong)
                .uniform("light_position", UniformValue::Vec3(light_eye))
                .uniform("use_texture", UniformValue::Int(0)),
        ];

        self.scene.render_frame(ctx.adapter.gl());
    }
}
