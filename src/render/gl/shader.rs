// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use crate::util::get_abs_path;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;
use std::fs;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    fn gl_type(self) -> u32 {
        match self {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

/// Tagged uniform value, dispatched by a single setter.
#[derive(Clone, Copy, Debug)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// A shader program owning its compiled stage objects.
///
/// Compile and link failures are not fatal here: they return the driver
/// diagnostic and retain it in `log`, the caller decides whether to abort.
/// A successful relink replaces the previous program build in place; a
/// failed one keeps the previously linked program usable.
pub struct GlProgram {
    program: Option<glow::Program>,
    stages: Vec<glow::Shader>,
    log: String,
}

impl GlProgram {
    pub fn new() -> Self {
        Self {
            program: None,
            stages: vec![],
            log: String::new(),
        }
    }

    /// Compiles one stage and keeps it for the next link.
    pub fn add_stage(
        &mut self,
        gl: &glow::Context,
        kind: StageKind,
        source: &str,
    ) -> Result<(), String> {
        unsafe {
            let shader = gl.create_shader(kind.gl_type())?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if gl.get_shader_compile_status(shader) {
                self.stages.push(shader);
                Ok(())
            } else {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                self.log = log.clone();
                Err(log)
            }
        }
    }

    pub fn add_stage_from_file(
        &mut self,
        gl: &glow::Context,
        kind: StageKind,
        path: &str,
    ) -> Result<(), String> {
        let source =
            fs::read_to_string(get_abs_path(path)).map_err(|e| format!("{}: {}", path, e))?;
        self.add_stage(gl, kind, &source)
            .map_err(|e| format!("{}: {}", path, e))
    }

    /// Links the attached stages into a program.
    ///
    /// Link state is monotonic: only a successful link replaces (and
    /// releases) the previous build, so the wrapper keeps its identity
    /// across a relink and stays usable after a failed one.
    pub fn link(&mut self, gl: &glow::Context) -> Result<(), String> {
        unsafe {
            let program = gl.create_program()?;
            for stage in &self.stages {
                gl.attach_shader(program, *stage);
            }
            gl.link_program(program);
            if gl.get_program_link_status(program) {
                for stage in &self.stages {
                    gl.detach_shader(program, *stage);
                }
                if let Some(old) = self.program.take() {
                    gl.delete_program(old);
                }
                self.program = Some(program);
                Ok(())
            } else {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                self.log = log.clone();
                Err(log)
            }
        }
    }

    pub fn is_linked(&self) -> bool {
        self.program.is_some()
    }

    /// Last compile or link diagnostic from the driver.
    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(self.program);
        }
    }

    pub fn unbind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(None);
        }
    }

    /// Only valid after a successful link; an unknown name yields None,
    /// the driver's invalid-location sentinel.
    pub fn attribute_location(&self, gl: &glow::Context, name: &str) -> Option<u32> {
        self.program
            .and_then(|p| unsafe { gl.get_attrib_location(p, name) })
    }

    pub fn uniform_location(
        &self,
        gl: &glow::Context,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        self.program
            .and_then(|p| unsafe { gl.get_uniform_location(p, name) })
    }

    /// Fire-and-forget uniform setter. A name the linked program does not
    /// know resolves to no location and the call is a silent no-op,
    /// mirroring the permissive driver behavior the demos rely on.
    pub fn set_uniform(&self, gl: &glow::Context, name: &str, value: UniformValue) {
        if let Some(location) = self.uniform_location(gl, name) {
            unsafe {
                match value {
                    UniformValue::Int(v) => gl.uniform_1_i32(Some(&location), v),
                    UniformValue::Float(v) => gl.uniform_1_f32(Some(&location), v),
                    UniformValue::Vec2(v) => {
                        gl.uniform_2_f32_slice(Some(&location), &v.to_array())
                    }
                    UniformValue::Vec3(v) => {
                        gl.uniform_3_f32_slice(Some(&location), &v.to_array())
                    }
                    UniformValue::Vec4(v) => {
                        gl.uniform_4_f32_slice(Some(&location), &v.to_array())
                    }
                    UniformValue::Mat3(m) => {
                        gl.uniform_matrix_3_f32_slice(Some(&location), false, &m.to_cols_array())
                    }
                    UniformValue::Mat4(m) => {
                        gl.uniform_matrix_4_f32_slice(Some(&location), false, &m.to_cols_array())
                    }
                }
            }
        }
    }

    /// Builds a program from one vertex and one fragment source file, the
    /// shape every demo uses.
    pub fn build(gl: &glow::Context, vs_path: &str, fs_path: &str) -> Result<GlProgram, String> {
        let mut program = GlProgram::new();
        program.add_stage_from_file(gl, StageKind::Vertex, vs_path)?;
        program.add_stage_from_file(gl, StageKind::Fragment, fs_path)?;
        program
            .link(gl)
            .map_err(|e| format!("{} + {}: {}", vs_path, fs_path, e))?;
        Ok(program)
    }
}

impl Default for GlProgram {
    fn default() -> Self {
        Self::new()
    }
}
