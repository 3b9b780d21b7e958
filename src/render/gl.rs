// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! # OpenGL wrapper types
//!
//! The GL objects every demo needs, wrapped just far enough to hold the
//! invariants the render core depends on:
//!
//! - buffers are uploaded once at scene setup and immutable afterwards,
//!   with their element count kept as metadata
//! - shader programs retain their compile/link diagnostics and survive a
//!   failed relink with the previous build intact
//! - framebuffers are validated complete before any pass uses them, and an
//!   incomplete one is a setup-fatal error
//! - the texture unit registry is process-wide and activated in bulk by the
//!   pass orchestrator
//!
//! All functions take the `glow::Context` explicitly; nothing here stores
//! it. GPU resources live until process exit, matching the demos' one-shot
//! setup, so the wrappers do not implement Drop.

/// GPU buffer upload with element count metadata
pub mod buffer;

/// offscreen render target with attachment and completeness handling
pub mod framebuffer;

/// mesh objects: per-attribute buffers, material, scoped attribute binding
pub mod mesh_object;

/// shader stage compilation, program linking and uniform dispatch
pub mod shader;

/// image decoding, GL textures and the texture unit registry
pub mod texture;
