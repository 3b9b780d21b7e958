// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Render pass orchestration. Every demo frame is the same protocol: zero
//! or one offscreen passes (shadow depth, mirrored reflection) followed by
//! exactly one screen pass, then the buffer swap. Passes run strictly in
//! authored order on one thread, so a pass that samples the previous
//! pass's output only needs program order, no sync primitives. Draw order
//! within a pass is submission order; depth sorting is left to the depth
//! test.

use super::gl::{
    framebuffer::GlFrameBuffer,
    mesh_object::GlMeshObject,
    shader::{GlProgram, UniformValue},
    texture,
};
use glam::{Mat3, Mat4};
use glow::HasContext;

#[derive(Clone, Copy)]
pub struct PassCamera {
    pub projection: Mat4,
    pub view: Mat4,
}

impl PassCamera {
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self { projection, view }
    }
}

impl Default for PassCamera {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PassTarget {
    /// the default framebuffer
    Screen,
    /// an offscreen framebuffer owned by the scene, by index
    Offscreen(usize),
}

/// One object drawn with one program plus the uniforms specific to this
/// pass/object pair. The standard transform and material uniforms are set
/// by the orchestrator.
pub struct DrawCall {
    pub object: usize,
    pub program: usize,
    pub uniforms: Vec<(String, UniformValue)>,
}

impl DrawCall {
    pub fn new(object: usize, program: usize) -> Self {
        Self {
            object,
            program,
            uniforms: vec![],
        }
    }

    pub fn uniform(mut self, name: &str, value: UniformValue) -> Self {
        self.uniforms.push((name.to_string(), value));
        self
    }
}

pub struct RenderPass {
    pub target: PassTarget,
    pub camera: PassCamera,
    /// viewport in physical pixels, applied after the target is bound
    pub viewport: (i32, i32),
    pub clear_color: Option<[f32; 4]>,
    pub clear_depth: bool,
    /// winding of front faces; a mirrored camera flips it
    pub front_face: u32,
    pub draws: Vec<DrawCall>,
}

impl RenderPass {
    pub fn new(target: PassTarget) -> Self {
        Self {
            target,
            camera: PassCamera::default(),
            viewport: (0, 0),
            clear_color: Some([1.0, 1.0, 1.0, 1.0]),
            clear_depth: true,
            front_face: glow::CCW,
            draws: vec![],
        }
    }
}

/// All GPU state of one demo: programs, mesh objects, offscreen targets
/// and the ordered pass list. Everything is created at setup and indexed
/// by position afterwards.
#[derive(Default)]
pub struct Scene {
    pub programs: Vec<GlProgram>,
    pub objects: Vec<GlMeshObject>,
    pub framebuffers: Vec<GlFrameBuffer>,
    pub passes: Vec<RenderPass>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_program(&mut self, program: GlProgram) -> usize {
        self.programs.push(program);
        self.programs.len() - 1
    }

    pub fn add_object(&mut self, object: GlMeshObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn add_framebuffer(&mut self, framebuffer: GlFrameBuffer) -> usize {
        self.framebuffers.push(framebuffer);
        self.framebuffers.len() - 1
    }

    /// Renders one frame: activate the texture unit registry, run every
    /// pass in order, deactivate. The offscreen pass is fully unbound
    /// before the screen pass samples its output.
    pub fn render_frame(&self, gl: &glow::Context) {
        texture::texture_units_activate(gl);
        for pass in &self.passes {
            self.render_pass(gl, pass);
        }
        texture::texture_units_deactivate(gl);
    }

    fn render_pass(&self, gl: &glow::Context, pass: &RenderPass) {
        match pass.target {
            PassTarget::Offscreen(index) => self.framebuffers[index].bind(gl),
            PassTarget::Screen => unsafe {
                gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            },
        }

        unsafe {
            gl.viewport(0, 0, pass.viewport.0, pass.viewport.1);
            gl.front_face(pass.front_face);

            let mut mask = 0;
            if let Some(c) = pass.clear_color {
                gl.clear_color(c[0], c[1], c[2], c[3]);
                mask |= glow::COLOR_BUFFER_BIT;
            }
            if pass.clear_depth {
                gl.clear_depth_f32(1.0);
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            if mask != 0 {
                gl.clear(mask);
            }
        }

        for draw in &pass.draws {
            let object = &self.objects[draw.object];
            let program = &self.programs[draw.program];

            program.bind(gl);

            let model_view = pass.camera.view * object.transform;
            let normal_matrix = Mat3::from_mat4(model_view.inverse().transpose());
            program.set_uniform(
                gl,
                "projection_matrix",
                UniformValue::Mat4(pass.camera.projection),
            );
            program.set_uniform(gl, "view_matrix", UniformValue::Mat4(pass.camera.view));
            program.set_uniform(gl, "model_matrix", UniformValue::Mat4(object.transform));
            program.set_uniform(gl, "model_view_matrix", UniformValue::Mat4(model_view));
            program.set_uniform(gl, "normal_matrix", UniformValue::Mat3(normal_matrix));
            program.set_uniform(
                gl,
                "material.diffuse",
                UniformValue::Vec3(object.material.diffuse),
            );
            program.set_uniform(
                gl,
                "material.specular",
                UniformValue::Vec3(object.material.specular),
            );
            program.set_uniform(
                gl,
                "material.shininess",
                UniformValue::Float(object.material.shininess),
            );
            for (name, value) in &draw.uniforms {
                program.set_uniform(gl, name, *value);
            }

            object.render(gl, program);
            program.unbind(gl);
        }

        if let PassTarget::Offscreen(index) = pass.target {
            self.framebuffers[index].unbind(gl);
        }
    }
}
