// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Context encapsulates the public per-frame variables: the stage counter,
//! the input events polled this frame and the window adapter owning the GL
//! context. Demos used to keep this state in globals; passing one Context
//! into every update keeps the same single-threaded access pattern explicit.

use crate::{event::Event, render::adapter::WindowAdapter, util::get_glint_root_path};

pub struct Context {
    pub game_name: String,
    pub project_path: String,
    pub stage: u32,
    pub input_events: Vec<Event>,
    pub adapter: WindowAdapter,
}

impl Context {
    pub fn new(name: &str, title: &str, width: u32, height: u32) -> Self {
        Self {
            game_name: name.to_string(),
            project_path: get_glint_root_path(),
            stage: 0,
            input_events: vec![],
            adapter: WindowAdapter::new(title, width, height),
        }
    }
}
