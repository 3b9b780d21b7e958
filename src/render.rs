// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Render module.
//! adapter: window + OpenGL context management (winit + glutin + glow).
//! gl: thin wrappers over the raw GL objects: buffers, shader programs,
//! textures, framebuffers and mesh objects.
//! scene: the multi-pass frame composition shared by every demo.

pub mod adapter;
pub mod gl;
pub mod scene;
