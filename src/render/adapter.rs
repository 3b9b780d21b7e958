// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Window adapter based on the winit + glutin + glow stack.
//!
//! - winit: cross-platform window management and event handling
//! - glutin: OpenGL context management
//! - glow: OpenGL bindings
//!
//! The adapter owns the window, the GL context/surface and the shared
//! `glow::Context`. Native window events are converted into the unified
//! `Event` type; the frame loop polls them once per frame via
//! `poll_event`. Buffer swaps wait on vsync, which paces the whole
//! single-threaded frame loop.

use crate::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use glow::HasContext;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::GlSurface,
    surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use log::info;
use std::{ffi::CString, num::NonZeroU32, sync::Arc, time::Duration};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::EventLoop,
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    raw_window_handle::HasWindowHandle,
    window::Window,
};

pub struct WindowAdapter {
    pub title: String,
    /// window client size in physical pixels
    pub width: u32,
    pub height: u32,

    window: Option<Arc<Window>>,
    event_loop: Option<EventLoop<()>>,
    gl_context: Option<PossiblyCurrentContext>,
    gl_surface: Option<Surface<WindowSurface>>,
    gl: Option<glow::Context>,
    app_handler: Option<AppHandler>,
    should_exit: bool,
}

/// Application event handler for the pump events mode.
///
/// Window and GL resources are created lazily in the resumed event, so the
/// handler reaches back into the adapter through a raw pointer. The
/// adapter must not move while the handler is installed; `open` installs
/// it only once the adapter sits in its final place.
struct AppHandler {
    pending_events: Vec<Event>,
    cursor_position: (f64, f64),
    should_exit: bool,
    adapter_ref: *mut WindowAdapter,
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(adapter) = unsafe { self.adapter_ref.as_mut() } {
            if adapter.window.is_none() {
                adapter.create_window_and_context(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.should_exit = true;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(adapter) = unsafe { self.adapter_ref.as_mut() } {
                    adapter.resize_surface(size.width, size.height);
                }
                self.pending_events
                    .push(Event::Resized(size.width, size.height));
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                if let Some(e) = key_event_from_winit(&key_event) {
                    self.pending_events.push(e);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x, position.y);
                self.pending_events.push(Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Moved,
                    x: position.x as i32,
                    y: position.y as i32,
                }));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    _ => return,
                };
                let kind = match state {
                    ElementState::Pressed => MouseEventKind::Down(button),
                    ElementState::Released => MouseEventKind::Up(button),
                };
                self.pending_events.push(Event::Mouse(MouseEvent {
                    kind,
                    x: self.cursor_position.0 as i32,
                    y: self.cursor_position.1 as i32,
                }));
            }
            _ => {}
        }
    }
}

fn key_event_from_winit(event: &winit::event::KeyEvent) -> Option<Event> {
    use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};

    if event.repeat {
        return None;
    }
    let kind = match event.state {
        ElementState::Pressed => KeyEventKind::Press,
        ElementState::Released => KeyEventKind::Release,
    };
    let code = match event.physical_key {
        PhysicalKey::Code(code) => match code {
            WinitKey::Escape => KeyCode::Esc,
            WinitKey::Space => KeyCode::Space,
            WinitKey::Enter => KeyCode::Enter,
            WinitKey::ShiftLeft | WinitKey::ShiftRight => KeyCode::Shift,
            WinitKey::ArrowUp => KeyCode::Up,
            WinitKey::ArrowDown => KeyCode::Down,
            WinitKey::ArrowLeft => KeyCode::Left,
            WinitKey::ArrowRight => KeyCode::Right,
            WinitKey::KeyA => KeyCode::Char('a'),
            WinitKey::KeyB => KeyCode::Char('b'),
            WinitKey::KeyC => KeyCode::Char('c'),
            WinitKey::KeyD => KeyCode::Char('d'),
            WinitKey::KeyE => KeyCode::Char('e'),
            WinitKey::KeyF => KeyCode::Char('f'),
            WinitKey::KeyG => KeyCode::Char('g'),
            WinitKey::KeyH => KeyCode::Char('h'),
            WinitKey::KeyI => KeyCode::Char('i'),
            WinitKey::KeyJ => KeyCode::Char('j'),
            WinitKey::KeyK => KeyCode::Char('k'),
            WinitKey::KeyL => KeyCode::Char('l'),
            WinitKey::KeyM => KeyCode::Char('m'),
            WinitKey::KeyN => KeyCode::Char('n'),
            WinitKey::KeyO => KeyCode::Char('o'),
            WinitKey::KeyP => KeyCode::Char('p'),
            WinitKey::KeyQ => KeyCode::Char('q'),
            WinitKey::KeyR => KeyCode::Char('r'),
            WinitKey::KeyS => KeyCode::Char('s'),
            WinitKey::KeyT => KeyCode::Char('t'),
            WinitKey::KeyU => KeyCode::Char('u'),
            WinitKey::KeyV => KeyCode::Char('v'),
            WinitKey::KeyW => KeyCode::Char('w'),
            WinitKey::KeyX => KeyCode::Char('x'),
            WinitKey::KeyY => KeyCode::Char('y'),
            WinitKey::KeyZ => KeyCode::Char('z'),
            _ => return None,
        },
        _ => return None,
    };
    Some(Event::Key(KeyEvent::new_with_kind(
        code,
        KeyModifiers::NONE,
        kind,
    )))
}

impl WindowAdapter {
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_string(),
            width,
            height,
            window: None,
            event_loop: None,
            gl_context: None,
            gl_surface: None,
            gl: None,
            app_handler: None,
            should_exit: false,
        }
    }

    /// Creates the event loop and pumps it until the window and GL context
    /// exist. Call once, after the adapter has reached its final memory
    /// location, before any GPU resource is created.
    pub fn open(&mut self) -> Result<(), String> {
        let event_loop = EventLoop::new().map_err(|e| format!("event loop: {}", e))?;
        self.event_loop = Some(event_loop);
        self.app_handler = Some(AppHandler {
            pending_events: Vec::new(),
            cursor_position: (0.0, 0.0),
            should_exit: false,
            adapter_ref: self as *mut WindowAdapter,
        });

        // window creation happens inside the resumed event
        for _ in 0..100 {
            if self.gl.is_some() {
                return Ok(());
            }
            let (Some(event_loop), Some(handler)) =
                (self.event_loop.as_mut(), self.app_handler.as_mut())
            else {
                break;
            };
            event_loop.pump_app_events(Some(Duration::from_millis(10)), handler);
        }
        if self.gl.is_some() {
            Ok(())
        } else {
            Err("failed to open window and GL context".to_string())
        }
    }

    fn create_window_and_context(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        info!("Creating OpenGL window and context...");

        let window_size = LogicalSize::new(self.width, self.height);
        let template = ConfigTemplateBuilder::new().with_depth_size(16);
        let display_builder = DisplayBuilder::new().with_window_attributes(Some(
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(window_size),
        ));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .unwrap()
            })
            .unwrap();

        let window = Arc::new(window.unwrap());
        let physical_size = window.inner_size();
        self.width = physical_size.width;
        self.height = physical_size.height;

        let gl_display = gl_config.display();
        let raw_window_handle = window.window_handle().unwrap().as_raw();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window_handle));

        let not_current_gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .expect("failed to create context")
        };

        let gl_surface = unsafe {
            let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
                raw_window_handle,
                NonZeroU32::new(physical_size.width).unwrap(),
                NonZeroU32::new(physical_size.height).unwrap(),
            );
            gl_config
                .display()
                .create_window_surface(&gl_config, &attrs)
                .unwrap()
        };

        let gl_context = not_current_gl_context.make_current(&gl_surface).unwrap();

        // vsync: the swap at the end of each frame blocks until the next
        // display refresh
        let _ = gl_surface.set_swap_interval(
            &gl_context,
            SwapInterval::Wait(NonZeroU32::new(1).unwrap()),
        );

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                let s = CString::new(s)
                    .expect("failed to construct C string from string for gl proc address");
                gl_display.get_proc_address(&s)
            })
        };

        unsafe {
            // core profile requires a bound vertex array object; one shared
            // VAO keeps the per-draw attribute binding protocol valid
            let vao = gl.create_vertex_array().unwrap();
            gl.bind_vertex_array(Some(vao));

            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
        }

        self.window = Some(window);
        self.gl_context = Some(gl_context);
        self.gl_surface = Some(gl_surface);
        self.gl = Some(gl);

        info!(
            "OpenGL window & context initialized ({}x{})",
            physical_size.width, physical_size.height
        );
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if let (Some(surface), Some(context), Some(w), Some(h)) = (
            &self.gl_surface,
            &self.gl_context,
            NonZeroU32::new(width),
            NonZeroU32::new(height),
        ) {
            surface.resize(context, w, h);
        }
    }

    /// Polls window events, converting them into unified events appended
    /// to `es`. Returns true when the program should exit (window closed).
    pub fn poll_event(&mut self, timeout: Duration, es: &mut Vec<Event>) -> bool {
        if let (Some(event_loop), Some(handler)) =
            (self.event_loop.as_mut(), self.app_handler.as_mut())
        {
            let status = event_loop.pump_app_events(Some(timeout), handler);
            es.append(&mut handler.pending_events);
            if handler.should_exit || matches!(status, PumpStatus::Exit(_)) {
                self.should_exit = true;
            }
        }
        self.should_exit
    }

    pub fn swap_buffers(&self) {
        if let (Some(surface), Some(context)) = (&self.gl_surface, &self.gl_context) {
            if let Err(e) = surface.swap_buffers(context) {
                log::error!("failed to swap buffers: {:?}", e);
            }
        }
    }

    /// The shared GL context. Only valid after `open` succeeded.
    pub fn gl(&self) -> &glow::Context {
        self.gl.as_ref().expect("GL context not initialized")
    }
}
