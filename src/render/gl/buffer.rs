// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use glow::HasContext;

/// A GPU buffer created once from a CPU side array, static draw usage.
/// `count` is the exact element count of the uploaded array and `stride`
/// the number of elements per vertex (or per triangle for index data);
/// render code derives presence flags, attribute sizes and draw counts
/// from them.
pub struct GlArrayBuffer {
    pub handle: glow::Buffer,
    pub count: usize,
    pub stride: usize,
}

impl GlArrayBuffer {
    pub fn from_f32(gl: &glow::Context, data: &[f32], stride: usize) -> Result<Self, String> {
        unsafe {
            let handle = gl.create_buffer()?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(handle));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                data.align_to::<u8>().1,
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(Self {
                handle,
                count: data.len(),
                stride,
            })
        }
    }

    pub fn from_indices(gl: &glow::Context, data: &[u32]) -> Result<Self, String> {
        unsafe {
            let handle = gl.create_buffer()?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(handle));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                data.align_to::<u8>().1,
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            Ok(Self {
                handle,
                count: data.len(),
                stride: 3,
            })
        }
    }
}
