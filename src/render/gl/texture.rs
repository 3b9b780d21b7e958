// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Textures and the process-wide texture unit registry.
//!
//! A texture is created once, either from decoded image data or as an
//! empty store that a framebuffer later attaches. Mesh objects and the
//! registry only hold copyable `TextureRef`s; whoever created the texture
//! owns it and nothing here ever destroys one it merely references.

use crate::util::get_abs_path;
use glow::HasContext;
use lazy_static::lazy_static;
use log::warn;
use std::sync::Mutex;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImageFormat {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl ImageFormat {
    pub fn channel_count(self) -> u32 {
        match self {
            ImageFormat::Gray => 1,
            ImageFormat::GrayAlpha => 2,
            ImageFormat::Rgb => 3,
            ImageFormat::Rgba => 4,
        }
    }

    fn gl_format(self) -> u32 {
        match self {
            ImageFormat::Gray => glow::RED,
            ImageFormat::GrayAlpha => glow::RG,
            ImageFormat::Rgb => glow::RGB,
            ImageFormat::Rgba => glow::RGBA,
        }
    }
}

/// Decoded image pixels plus the metadata the GL upload needs.
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub byte_depth: u32,
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl ImageData {
    /// Decodes a png file. Color types other than gray, gray+alpha, rgb
    /// and rgba are a hard failure.
    pub fn from_png_file(path: &str) -> Result<Self, String> {
        let img = image::open(get_abs_path(path)).map_err(|e| format!("{}: {}", path, e))?;
        let (format, width, height, data) = match img {
            image::DynamicImage::ImageLuma8(buf) => {
                let (w, h) = buf.dimensions();
                (ImageFormat::Gray, w, h, buf.into_raw())
            }
            image::DynamicImage::ImageLumaA8(buf) => {
                let (w, h) = buf.dimensions();
                (ImageFormat::GrayAlpha, w, h, buf.into_raw())
            }
            image::DynamicImage::ImageRgb8(buf) => {
                let (w, h) = buf.dimensions();
                (ImageFormat::Rgb, w, h, buf.into_raw())
            }
            image::DynamicImage::ImageRgba8(buf) => {
                let (w, h) = buf.dimensions();
                (ImageFormat::Rgba, w, h, buf.into_raw())
            }
            _ => return Err(format!("{}: unsupported color type", path)),
        };
        Ok(Self {
            width,
            height,
            byte_depth: format.channel_count(),
            format,
            data,
        })
    }
}

/// Copyable reference to a texture, enough to bind it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TextureRef {
    pub target: u32,
    pub texture: glow::Texture,
}

pub struct GlTexture {
    pub texture: glow::Texture,
    pub target: u32,
    pub width: u32,
    pub height: u32,
}

impl GlTexture {
    /// Uploads decoded image pixels into a new 2d texture.
    pub fn from_image(gl: &glow::Context, img: &ImageData) -> Result<Self, String> {
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            let format = img.format.gl_format();
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format as i32,
                img.width as i32,
                img.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                Some(&img.data),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                texture,
                target: glow::TEXTURE_2D,
                width: img.width,
                height: img.height,
            })
        }
    }

    /// Empty rgba store sized for use as a framebuffer color attachment.
    pub fn color_target(gl: &glow::Context, width: u32, height: u32) -> Result<Self, String> {
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                None,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                texture,
                target: glow::TEXTURE_2D,
                width,
                height,
            })
        }
    }

    /// Empty 16 bit depth store for shadow map passes.
    pub fn depth_target(gl: &glow::Context, width: u32, height: u32) -> Result<Self, String> {
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::DEPTH_COMPONENT16 as i32,
                width as i32,
                height as i32,
                0,
                glow::DEPTH_COMPONENT,
                glow::UNSIGNED_SHORT,
                None,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                texture,
                target: glow::TEXTURE_2D,
                width,
                height,
            })
        }
    }

    pub fn texture_ref(&self) -> TextureRef {
        TextureRef {
            target: self.target,
            texture: self.texture,
        }
    }
}

/// Fixed-size table mapping texture unit indices to attached textures.
/// Attach and detach are last-writer-wins per slot; empty slots are
/// skipped during activation, not an error.
pub struct TextureUnits {
    slots: Vec<Option<TextureRef>>,
}

impl TextureUnits {
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    pub fn attach(&mut self, index: usize, texture: TextureRef) {
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Some(texture),
            None => warn!("texture unit {} out of range, attach ignored", index),
        }
    }

    pub fn detach(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    /// Occupied slots in ascending unit order.
    pub fn occupied(&self) -> Vec<(usize, TextureRef)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|t| (i, t)))
            .collect()
    }

    pub fn activate_all(&self, gl: &glow::Context) {
        for (index, t) in self.occupied() {
            unsafe {
                gl.active_texture(glow::TEXTURE0 + index as u32);
                gl.bind_texture(t.target, Some(t.texture));
            }
        }
    }

    pub fn deactivate_all(&self, gl: &glow::Context) {
        for (index, t) in self.occupied() {
            unsafe {
                gl.active_texture(glow::TEXTURE0 + index as u32);
                gl.bind_texture(t.target, None);
            }
        }
    }
}

// Exactly one registry exists per process; scene setup attaches, the pass
// orchestrator activates per frame. Mutation only ever happens between
// frames on the render thread.
lazy_static! {
    pub static ref TEXTURE_UNITS: Mutex<TextureUnits> = Mutex::new(TextureUnits::new(0));
}

pub fn texture_units_init(count: usize) {
    *TEXTURE_UNITS.lock().unwrap() = TextureUnits::new(count);
}

pub fn texture_unit_attach(index: usize, texture: TextureRef) {
    TEXTURE_UNITS.lock().unwrap().attach(index, texture);
}

pub fn texture_unit_detach(index: usize) {
    TEXTURE_UNITS.lock().unwrap().detach(index);
}

pub fn texture_units_activate(gl: &glow::Context) {
    TEXTURE_UNITS.lock().unwrap().activate_all(gl);
}

pub fn texture_units_deactivate(gl: &glow::Context) {
    TEXTURE_UNITS.lock().unwrap().deactivate_all(gl);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn tex(id: u32) -> TextureRef {
        TextureRef {
            target: glow::TEXTURE_2D,
            texture: glow::NativeTexture(NonZeroU32::new(id).unwrap()),
        }
    }

    #[test]
    fn it_activates_only_occupied_slots_in_ascending_order() {
        let mut units = TextureUnits::new(4);
        units.attach(2, tex(7));
        units.attach(1, tex(3));
        let occupied = units.occupied();
        assert_eq!(occupied.len(), 2);
        assert_eq!(occupied[0].0, 1);
        assert_eq!(occupied[0].1, tex(3));
        assert_eq!(occupied[1].0, 2);
        assert_eq!(occupied[1].1, tex(7));
    }

    #[test]
    fn attach_is_last_writer_wins() {
        let mut units = TextureUnits::new(4);
        units.attach(1, tex(3));
        units.attach(1, tex(9));
        assert_eq!(units.occupied(), vec![(1, tex(9))]);
    }

    #[test]
    fn detach_empties_the_slot() {
        let mut units = TextureUnits::new(2);
        units.attach(0, tex(1));
        units.detach(0);
        assert!(units.occupied().is_empty());
        // detaching an already empty slot is a no-op
        units.detach(1);
        assert!(units.occupied().is_empty());
    }

    #[test]
    fn out_of_range_attach_is_ignored() {
        let mut units = TextureUnits::new(2);
        units.attach(5, tex(1));
        assert!(units.occupied().is_empty());
    }

    #[test]
    fn image_format_channels() {
        assert_eq!(ImageFormat::Gray.channel_count(), 1);
        assert_eq!(ImageFormat::GrayAlpha.channel_count(), 2);
        assert_eq!(ImageFormat::Rgb.channel_count(), 3);
        assert_eq!(ImageFormat::Rgba.channel_count(), 4);
    }

    #[test]
    fn it_decodes_png_files_with_a_format_tag() {
        let dir = std::env::temp_dir().join("rust_glint_png_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rgb.png");
        let img = image::RgbImage::from_fn(4, 2, |x, _y| image::Rgb([x as u8 * 60, 0, 255]));
        img.save(&path).unwrap();

        let decoded = ImageData::from_png_file(path.to_str().unwrap()).unwrap();
        assert_eq!(decoded.format, ImageFormat::Rgb);
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.byte_depth, 3);
        assert_eq!(decoded.data.len(), 4 * 2 * 3);
        assert_eq!(&decoded.data[0..3], &[0, 0, 255]);
    }

    #[test]
    fn it_rejects_missing_image_files() {
        assert!(ImageData::from_png_file("/no/such/file.png").is_err());
    }
}
