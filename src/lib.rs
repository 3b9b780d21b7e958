// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! RustGlint is a small multi-pass OpenGL rendering engine for 3d demo scenes.
//! It grew out of a family of near-identical GLFW demo programs (spinning
//! teapot, bump mapping, planar reflection, shadow mapping) and keeps exactly
//! the core those demos share: GPU resource upload, shader program wrapping,
//! offscreen framebuffer targets, a texture unit registry and a small
//! render pass orchestrator.
//!
//! All GPU resources are created once during scene setup and live until
//! process exit. Everything runs on one thread: the frame loop polls window
//! events, updates the model, renders every pass in order and swaps.
//!
//! Demo applications live in the apps workspace and follow the Model/Render
//! split encapsulated by the game module.

/// unified keyboard/mouse/resize input events
pub mod event;

/// public per-frame state: stage counter, input events and the window adapter
pub mod context;

/// Model and Render traits plus the main loop
pub mod game;

/// log init based on log4rs
pub mod log;

/// CPU side mesh data: flat attribute arrays, built-in cube/plane,
/// tangent computation and the binary mesh importer
pub mod mesh;

/// Render module: window adapter (winit + glutin + glow), the OpenGL
/// wrapper types and the scene pass orchestrator
pub mod render;

/// path helpers and the quaternion trackball
pub mod util;
