//! Input encoder
//!
//! Lowers device events into [`InputEvent`]s, hands them to the engine and
//! flushes the bytes the engine encodes to the host PTY.
//!
//! Write failures are logged and dropped (see `coord::bridge::write_frames`);
//! user input never propagates an error.

use tracing::{debug, trace, warn};

use crate::coord::bridge::{write_frames, FlushStats};
use crate::core::engine::Engine;
use crate::core::host::Host;
use crate::ui::clipboard::Clipboard;
use crate::ui::input::{InputEvent, KeyInput, KeyPhase, MousePhase, PointerInput, WheelInput};

/// What happened to a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Copy shortcut consumed: selection copied, nothing sent to the PTY
    Copied,
    /// Encoded by the engine and flushed
    Encoded(FlushStats),
}

pub struct InputEncoder {
    session_id: String,
    cell_width: f32,
    cell_height: f32,
    /// The first focus after attach must not reach the shell
    skip_focus_flush: bool,
}

impl InputEncoder {
    pub fn new(session_id: impl Into<String>, cell_width: f32, cell_height: f32) -> Self {
        Self {
            session_id: session_id.into(),
            cell_width,
            cell_height,
            skip_focus_flush: true,
        }
    }

    pub fn key_down(
        &mut self,
        key: &KeyInput,
        engine: &mut dyn Engine,
        host: &dyn Host,
        clipboard: &mut dyn Clipboard,
    ) -> KeyOutcome {
        if key.is_copy_shortcut() {
            if let Some(text) = engine.copy_selection().filter(|text| !text.is_empty()) {
                match clipboard.set_text(&text) {
                    Ok(()) => debug!("Copied {} bytes to clipboard", text.len()),
                    Err(e) => warn!("Failed to copy selection: {}", e),
                }
                return KeyOutcome::Copied;
            }
        }
        KeyOutcome::Encoded(self.submit(key.to_event(KeyPhase::Down), engine, host))
    }

    pub fn key_up(&mut self, key: &KeyInput, engine: &mut dyn Engine, host: &dyn Host) -> FlushStats {
        self.submit(key.to_event(KeyPhase::Up), engine, host)
    }

    pub fn mouse(
        &mut self,
        phase: MousePhase,
        pointer: &PointerInput,
        engine: &mut dyn Engine,
        host: &dyn Host,
    ) -> FlushStats {
        let event = pointer.to_event(phase, self.cell_width, self.cell_height);
        self.submit(event, engine, host)
    }

    pub fn wheel(&mut self, wheel: &WheelInput, engine: &mut dyn Engine, host: &dyn Host) -> FlushStats {
        let event = wheel.to_event(self.cell_width, self.cell_height);
        self.submit(event, engine, host)
    }

    /// Paste `text`, or the clipboard contents when the event carried none
    pub fn paste(
        &mut self,
        text: Option<&str>,
        engine: &mut dyn Engine,
        host: &dyn Host,
        clipboard: &mut dyn Clipboard,
    ) -> FlushStats {
        let text = match text {
            Some(text) => text.to_string(),
            None => match clipboard.get_text() {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read clipboard for paste: {}", e);
                    return FlushStats::default();
                }
            },
        };
        if text.is_empty() {
            return FlushStats::default();
        }
        self.submit(InputEvent::Paste { text }, engine, host)
    }

    pub fn focus(&mut self, focused: bool, engine: &mut dyn Engine, host: &dyn Host) -> FlushStats {
        engine.input(&InputEvent::Focus { focused });
        if focused && self.skip_focus_flush {
            self.skip_focus_flush = false;
            let discarded = engine.drain_encoded_input_bytes();
            debug!("Discarded {} initial focus frame(s)", discarded.len());
            return FlushStats::default();
        }
        self.flush(engine, host)
    }

    /// Hand one event to the engine and flush what it encoded
    fn submit(&mut self, event: InputEvent, engine: &mut dyn Engine, host: &dyn Host) -> FlushStats {
        trace!("Input {:?}", event);
        match &event {
            InputEvent::Paste { text } => engine.paste_text(text),
            _ => engine.input(&event),
        }
        self.flush(engine, host)
    }

    fn flush(&mut self, engine: &mut dyn Engine, host: &dyn Host) -> FlushStats {
        write_frames(host, &self.session_id, engine.drain_encoded_input_bytes())
    }
}
