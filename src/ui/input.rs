//! Input vocabulary
//!
//! [`DeviceEvent`] is what the surface reports (pixel positions, raw key
//! names). [`InputEvent`] is the only vocabulary the engine accepts; every
//! device event is lowered into it before reaching the engine.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton as CtMouseButton};

use crate::core::grid::CellPos;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        if mods.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
            result |= Modifiers::META;
        }
        result
    }
}

impl Modifiers {
    /// Ctrl or Cmd, whichever the platform uses for shortcuts
    pub fn has_shortcut_modifier(&self) -> bool {
        self.intersects(Modifiers::CTRL | Modifiers::META)
    }
}

bitflags! {
    /// Buttons currently held during a pointer event
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const PRIMARY   = 0b001;
        const SECONDARY = 0b010;
        const AUXILIARY = 0b100;
    }
}

/// The button that changed state in a pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(u8),
}

impl MouseButton {
    /// Conventional button number (0 primary, 1 auxiliary, 2 secondary)
    pub fn code(&self) -> u8 {
        match self {
            MouseButton::Primary => 0,
            MouseButton::Auxiliary => 1,
            MouseButton::Secondary => 2,
            MouseButton::Other(n) => *n,
        }
    }

    /// The held-buttons mask for this button alone
    pub fn held(&self) -> Buttons {
        match self {
            MouseButton::Primary => Buttons::PRIMARY,
            MouseButton::Auxiliary => Buttons::AUXILIARY,
            MouseButton::Secondary => Buttons::SECONDARY,
            MouseButton::Other(_) => Buttons::empty(),
        }
    }
}

impl From<CtMouseButton> for MouseButton {
    fn from(button: CtMouseButton) -> Self {
        match button {
            CtMouseButton::Left => MouseButton::Primary,
            CtMouseButton::Middle => MouseButton::Auxiliary,
            CtMouseButton::Right => MouseButton::Secondary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MousePhase {
    Down,
    Up,
    Move,
    Drag,
}

/// Structured input accepted by the engine
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Key {
        phase: KeyPhase,
        /// Logical key ("a", "Enter", "ArrowUp")
        key: String,
        /// Physical key code ("KeyA", "Enter")
        code: String,
        repeat: bool,
        mods: Modifiers,
    },
    Mouse {
        phase: MousePhase,
        cell: CellPos,
        button: MouseButton,
        mods: Modifiers,
    },
    Wheel {
        cell: CellPos,
        /// -1, 0 or 1
        dx: i8,
        /// -1, 0 or 1
        dy: i8,
        mods: Modifiers,
    },
    Paste {
        text: String,
    },
    Focus {
        focused: bool,
    },
}

/// A key press or release as reported by the surface
#[derive(Clone, Debug, PartialEq)]
pub struct KeyInput {
    pub key: String,
    pub code: String,
    pub repeat: bool,
    pub mods: Modifiers,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, code: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            repeat: false,
            mods,
        }
    }

    /// Whether this is the copy shortcut (Ctrl+C / Cmd+C)
    pub fn is_copy_shortcut(&self) -> bool {
        self.mods.has_shortcut_modifier() && self.key == "c"
    }

    pub fn to_event(&self, phase: KeyPhase) -> InputEvent {
        InputEvent::Key {
            phase,
            key: self.key.clone(),
            code: self.code.clone(),
            // Releases never repeat
            repeat: phase == KeyPhase::Down && self.repeat,
            mods: self.mods,
        }
    }
}

/// A pointer event; `x`/`y` are logical pixels from the surface origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub x: f32,
    pub y: f32,
    pub button: MouseButton,
    pub buttons: Buttons,
    pub mods: Modifiers,
}

impl PointerInput {
    pub fn cell(&self, cell_width: f32, cell_height: f32) -> CellPos {
        CellPos::from_pixels(self.x, self.y, cell_width, cell_height)
    }

    pub fn to_event(&self, phase: MousePhase, cell_width: f32, cell_height: f32) -> InputEvent {
        InputEvent::Mouse {
            phase,
            cell: self.cell(cell_width, cell_height),
            button: self.button,
            mods: self.mods,
        }
    }

    /// Move or drag, depending on whether any button is held
    pub fn move_phase(&self) -> MousePhase {
        if self.buttons.is_empty() {
            MousePhase::Move
        } else {
            MousePhase::Drag
        }
    }
}

/// A wheel event; deltas are in whatever unit the surface reports
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    pub x: f32,
    pub y: f32,
    pub delta_x: f32,
    pub delta_y: f32,
    pub mods: Modifiers,
}

impl WheelInput {
    pub fn to_event(&self, cell_width: f32, cell_height: f32) -> InputEvent {
        InputEvent::Wheel {
            cell: CellPos::from_pixels(self.x, self.y, cell_width, cell_height),
            dx: unit_sign(self.delta_x),
            dy: unit_sign(self.delta_y),
            mods: self.mods,
        }
    }
}

fn unit_sign(delta: f32) -> i8 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}

/// Raw device events delivered by the surface's listeners
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    MouseDown(PointerInput),
    MouseUp(PointerInput),
    MouseMove(PointerInput),
    Wheel(WheelInput),
    /// Pasted text if the event carried it, otherwise read from the clipboard
    Paste(Option<String>),
    Focus,
    Blur,
}

/// Logical key name and physical code for a crossterm key
pub fn key_names(code: KeyCode) -> Option<(String, String)> {
    let named = |name: &str| Some((name.to_string(), name.to_string()));
    match code {
        KeyCode::Char(ch) => {
            let physical = if ch.is_ascii_alphabetic() {
                format!("Key{}", ch.to_ascii_uppercase())
            } else if ch.is_ascii_digit() {
                format!("Digit{}", ch)
            } else if ch == ' ' {
                "Space".to_string()
            } else {
                String::new()
            };
            Some((ch.to_string(), physical))
        }
        KeyCode::Enter => named("Enter"),
        KeyCode::Backspace => named("Backspace"),
        KeyCode::Tab | KeyCode::BackTab => named("Tab"),
        KeyCode::Esc => named("Escape"),
        KeyCode::Up => named("ArrowUp"),
        KeyCode::Down => named("ArrowDown"),
        KeyCode::Left => named("ArrowLeft"),
        KeyCode::Right => named("ArrowRight"),
        KeyCode::Home => named("Home"),
        KeyCode::End => named("End"),
        KeyCode::PageUp => named("PageUp"),
        KeyCode::PageDown => named("PageDown"),
        KeyCode::Insert => named("Insert"),
        KeyCode::Delete => named("Delete"),
        KeyCode::F(n) => {
            let name = format!("F{}", n);
            Some((name.clone(), name))
        }
        _ => None,
    }
}
