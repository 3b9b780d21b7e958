// RustGlint
// copyright zipxing@hotmail.com 2022~2024

use super::texture::GlTexture;
use glow::HasContext;
use log::error;

/// Offscreen render target. Owns its render buffer attachments; textures
/// attached as color/depth stores are only referenced, their creator keeps
/// ownership.
///
/// A framebuffer must report valid before any pass renders into it. The
/// demos treat an incomplete framebuffer as a setup-fatal error, later
/// passes assume completeness as a precondition.
pub struct GlFrameBuffer {
    pub handle: glow::Framebuffer,
    pub width: u32,
    pub height: u32,
    render_buffers: Vec<(u32, glow::Renderbuffer)>,
}

impl GlFrameBuffer {
    pub fn new(gl: &glow::Context, width: u32, height: u32) -> Result<Self, String> {
        let handle = unsafe { gl.create_framebuffer()? };
        Ok(Self {
            handle,
            width,
            height,
            render_buffers: vec![],
        })
    }

    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.handle));
            gl.viewport(0, 0, self.width as i32, self.height as i32);
        }
    }

    pub fn unbind(&self, gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    /// Attaches a texture as color or depth store. Must be called while
    /// bound.
    pub fn attach_texture(&self, gl: &glow::Context, attachment: u32, texture: &GlTexture) {
        unsafe {
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment,
                texture.target,
                Some(texture.texture),
                0,
            );
        }
    }

    /// Creates and attaches a render buffer with the given internal format
    /// (depth/stencil storage the passes never sample). Must be called
    /// while bound.
    pub fn attach_render_buffer(
        &mut self,
        gl: &glow::Context,
        attachment: u32,
        internal_format: u32,
    ) -> Result<(), String> {
        unsafe {
            let render_buffer = gl.create_renderbuffer()?;
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(render_buffer));
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                internal_format,
                self.width as i32,
                self.height as i32,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                attachment,
                glow::RENDERBUFFER,
                Some(render_buffer),
            );
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            self.render_buffers.push((attachment, render_buffer));
            Ok(())
        }
    }

    /// Selects the draw and read buffers while bound. A `None` draw list
    /// disables color writes entirely, the configuration shadow map passes
    /// use.
    pub fn select_draw_read_buffers(
        &self,
        gl: &glow::Context,
        draw_buffers: Option<&[u32]>,
        read_buffer: u32,
    ) {
        unsafe {
            gl.read_buffer(read_buffer);
            match draw_buffers {
                Some(buffers) => gl.draw_buffers(buffers),
                None => gl.draw_buffers(&[glow::NONE]),
            }
        }
    }

    /// Completeness check while bound, each incompleteness condition mapped
    /// to its named reason.
    pub fn status(&self, gl: &glow::Context) -> Result<(), String> {
        let code = unsafe { gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        if code == glow::FRAMEBUFFER_COMPLETE {
            Ok(())
        } else {
            Err(status_name(code).to_string())
        }
    }

    pub fn is_valid(&self, gl: &glow::Context) -> bool {
        match self.status(gl) {
            Ok(()) => true,
            Err(reason) => {
                error!("framebuffer incomplete: {}", reason);
                false
            }
        }
    }
}

/// Names a glCheckFramebufferStatus result.
pub fn status_name(code: u32) -> &'static str {
    match code {
        glow::FRAMEBUFFER_UNDEFINED => "FRAMEBUFFER_UNDEFINED",
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "FRAMEBUFFER_INCOMPLETE_ATTACHMENT",
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            "FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT"
        }
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER",
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "FRAMEBUFFER_INCOMPLETE_READ_BUFFER",
        glow::FRAMEBUFFER_UNSUPPORTED => "FRAMEBUFFER_UNSUPPORTED",
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "FRAMEBUFFER_INCOMPLETE_MULTISAMPLE",
        _ => "unknown framebuffer status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_names_each_incompleteness_condition_distinctly() {
        let codes = [
            glow::FRAMEBUFFER_UNDEFINED,
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT,
            glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER,
            glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER,
            glow::FRAMEBUFFER_UNSUPPORTED,
            glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE,
        ];
        let names: Vec<&str> = codes.iter().map(|c| status_name(*c)).collect();
        for (i, name) in names.iter().enumerate() {
            assert!(!name.contains("unknown"));
            for other in &names[i + 1..] {
                assert_ne!(name, other);
            }
        }
    }

    #[test]
    fn a_missing_attachment_classifies_as_incomplete_attachment() {
        assert_eq!(
            status_name(glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT),
            "FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT"
        );
        assert_eq!(
            status_name(glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT),
            "FRAMEBUFFER_INCOMPLETE_ATTACHMENT"
        );
    }

    #[test]
    fn unknown_codes_do_not_panic() {
        assert_eq!(status_name(0xdead), "unknown framebuffer status");
    }
}
