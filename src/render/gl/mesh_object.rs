// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use super::{buffer::GlArrayBuffer, shader::GlProgram, texture::TextureRef};
use crate::mesh::CpuMesh;
use glam::{Mat4, Vec3};
use glow::HasContext;

#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec3::ONE,
            specular: Vec3::splat(0.8),
            shininess: 2.0,
        }
    }
}

/// A texture this object binds to a unit for the duration of its draw call.
#[derive(Clone, Copy)]
pub struct TextureBinding {
    pub unit: u32,
    pub texture: TextureRef,
}

/// A renderable object: one immutable GPU buffer per vertex attribute, a
/// material and a model transform. The shader program is assigned per pass
/// by the orchestrator, not owned here.
pub struct GlMeshObject {
    pub vertex_buffer: GlArrayBuffer,
    pub normal_buffer: GlArrayBuffer,
    pub index_buffer: GlArrayBuffer,
    pub tex_coord_buffer: Option<GlArrayBuffer>,
    pub tangent_buffer: Option<GlArrayBuffer>,
    pub textures: Vec<TextureBinding>,
    pub material: Material,
    pub transform: Mat4,
}

impl GlMeshObject {
    /// Uploads every present attribute array of the mesh into its own
    /// buffer. Optional channels (uv, tangent) get a buffer iff their
    /// element count is non-zero; the presence decision is made here, once.
    pub fn build(gl: &glow::Context, mesh: &CpuMesh) -> Result<Self, String> {
        mesh.validate()?;

        let vertex_buffer = GlArrayBuffer::from_f32(gl, &mesh.vertices, 3)?;
        let normal_buffer = GlArrayBuffer::from_f32(gl, &mesh.normals, 3)?;
        let index_buffer = GlArrayBuffer::from_indices(gl, &mesh.indices)?;
        let tex_coord_buffer = if mesh.has_tex_coords() {
            Some(GlArrayBuffer::from_f32(gl, &mesh.tex_coords, 2)?)
        } else {
            None
        };
        let tangent_buffer = if mesh.has_tangents() {
            Some(GlArrayBuffer::from_f32(gl, &mesh.tangents, 3)?)
        } else {
            None
        };

        Ok(Self {
            vertex_buffer,
            normal_buffer,
            index_buffer,
            tex_coord_buffer,
            tangent_buffer,
            textures: vec![],
            material: Material::default(),
            transform: Mat4::IDENTITY,
        })
    }

    /// Draws the object with the currently bound program.
    ///
    /// Attributes are resolved by name against `program`, so the same
    /// object renders under any pass's shader. Binding state is scoped to
    /// this call: everything enabled here is disabled again before
    /// returning, nothing stays dangling.
    pub fn render(&self, gl: &glow::Context, program: &GlProgram) {
        let mut attribs = AttribScope::new(gl);

        self.bind_attribute(gl, program, &mut attribs, "vertex_position", &self.vertex_buffer);
        if self.normal_buffer.count > 0 {
            self.bind_attribute(gl, program, &mut attribs, "vertex_normal", &self.normal_buffer);
        }
        if let Some(buffer) = &self.tex_coord_buffer {
            self.bind_attribute(gl, program, &mut attribs, "vertex_tex_coord", buffer);
        }
        if let Some(buffer) = &self.tangent_buffer {
            self.bind_attribute(gl, program, &mut attribs, "vertex_tangent", buffer);
        }

        unsafe {
            for binding in &self.textures {
                gl.active_texture(glow::TEXTURE0 + binding.unit);
                gl.bind_texture(binding.texture.target, Some(binding.texture.texture));
            }

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.index_buffer.handle));
            gl.draw_elements(
                glow::TRIANGLES,
                self.index_buffer.count as i32,
                glow::UNSIGNED_INT,
                0,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            for binding in &self.textures {
                gl.active_texture(glow::TEXTURE0 + binding.unit);
                gl.bind_texture(binding.texture.target, None);
            }
        }
        // attribs drops here and disables every attribute it enabled
    }

    fn bind_attribute(
        &self,
        gl: &glow::Context,
        program: &GlProgram,
        attribs: &mut AttribScope,
        name: &str,
        buffer: &GlArrayBuffer,
    ) {
        // names the program does not declare resolve to None and are skipped
        if let Some(location) = program.attribute_location(gl, name) {
            unsafe {
                gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer.handle));
                gl.vertex_attrib_pointer_f32(
                    location,
                    buffer.stride as i32,
                    glow::FLOAT,
                    false,
                    0,
                    0,
                );
                gl.bind_buffer(glow::ARRAY_BUFFER, None);
            }
            attribs.enable(location);
        }
    }
}

/// Scope guard over enabled vertex attribute arrays: each location enabled
/// through it is disabled on drop, in reverse order.
struct AttribScope<'a> {
    gl: &'a glow::Context,
    locations: Vec<u32>,
}

impl<'a> AttribScope<'a> {
    fn new(gl: &'a glow::Context) -> Self {
        Self {
            gl,
            locations: vec![],
        }
    }

    fn enable(&mut self, location: u32) {
        unsafe {
            self.gl.enable_vertex_attrib_array(location);
        }
        self.locations.push(location);
    }
}

impl Drop for AttribScope<'_> {
    fn drop(&mut self) {
        for location in self.locations.iter().rev() {
            unsafe {
                self.gl.disable_vertex_attrib_array(*location);
            }
        }
    }
}
