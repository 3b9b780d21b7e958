// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! This module provides a unified input Event, describing events from
//! keyboard, mouse and window resize. Native window events polled by the
//! render adapter are converted to this unified Event and handled by the
//! demo models.

use bitflags::bitflags;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Event {
    /// A single key press or release.
    Key(KeyEvent),
    /// A single mouse event at a window pixel position.
    Mouse(MouseEvent),
    /// The window client area changed to the contained width/height.
    Resized(u32, u32),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MouseEvent {
    /// The kind of mouse event that was caused.
    pub kind: MouseEventKind,
    /// Window pixel coordinates of the cursor.
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MouseEventKind {
    /// Pressed mouse button. Contains the button that was pressed.
    Down(MouseButton),
    /// Released mouse button. Contains the button that was released.
    Up(MouseButton),
    /// Moved the mouse cursor.
    Moved,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

bitflags! {
    /// Represents key modifiers (shift, control, alt).
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CONTROL = 0b0000_0010;
        const ALT = 0b0000_0100;
        const NONE = 0b0000_0000;
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// Represents a key event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct KeyEvent {
    /// The key itself.
    pub code: KeyCode,
    /// Additional key modifiers.
    pub modifiers: KeyModifiers,
    /// Press or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }

    pub const fn new_with_kind(
        code: KeyCode,
        modifiers: KeyModifiers,
        kind: KeyEventKind,
    ) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyCode {
    Esc,
    Space,
    Enter,
    Shift,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}
