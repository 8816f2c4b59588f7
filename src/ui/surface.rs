//! Rendering surface
//!
//! The surface is where device listeners and the resize observer live.
//! Listeners are registered when a session becomes attached and released
//! when it detaches.

use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, Event as CtEvent, KeyEventKind, MouseEventKind,
};
use crossterm::execute;
use tracing::{debug, error, info, warn};

use crate::coord::event::{Event, EventSender};
use crate::core::grid::{Viewport, NOMINAL_CELL_HEIGHT, NOMINAL_CELL_WIDTH};
use crate::ui::input::{
    key_names, Buttons, DeviceEvent, KeyInput, Modifiers, MouseButton, PointerInput, WheelInput,
};

pub trait Surface {
    /// Current container size
    fn viewport(&self) -> Viewport;

    /// Start delivering device events and size changes to `events`
    fn register(&mut self, events: EventSender);

    /// Stop delivering events. Idempotent.
    fn unregister(&mut self);

    /// Ask for keyboard focus
    fn request_focus(&mut self);
}

/// Surface backed by the controlling terminal via crossterm.
///
/// Cell coordinates reported by the terminal are mapped onto nominal cell
/// pixels so the rest of the pipeline sees the same units as any other
/// surface.
pub struct CrosstermSurface {
    cell_width: f32,
    cell_height: f32,
    running: Arc<AtomicBool>,
    reader_thread: Option<JoinHandle<()>>,
    events: Option<EventSender>,
}

impl CrosstermSurface {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
            running: Arc::new(AtomicBool::new(false)),
            reader_thread: None,
            events: None,
        }
    }
}

impl CrosstermSurface {
    /// Stop and join the reader thread. Returns false if there was none.
    fn join_reader(&mut self) -> bool {
        let Some(handle) = self.reader_thread.take() else {
            return false;
        };
        self.running.store(false, Ordering::SeqCst);
        if handle.join().is_err() {
            warn!("Terminal event reader panicked");
        }
        true
    }
}

impl Default for CrosstermSurface {
    fn default() -> Self {
        Self::new(NOMINAL_CELL_WIDTH, NOMINAL_CELL_HEIGHT)
    }
}

impl Surface for CrosstermSurface {
    fn viewport(&self) -> Viewport {
        let (cols, rows) = crossterm::terminal::size().unwrap_or_else(|e| {
            warn!("Failed to query terminal size, assuming 80x24: {}", e);
            (80, 24)
        });
        Viewport::new(cols as f32 * self.cell_width, rows as f32 * self.cell_height, 1.0)
    }

    fn register(&mut self, events: EventSender) {
        if self.running.load(Ordering::SeqCst) {
            return;
        }
        // A reader that stopped on a poll/read error is still joinable
        if self.join_reader() {
            debug!("Reaped stopped terminal event reader");
        }
        if let Err(e) = execute!(stdout(), EnableMouseCapture, EnableFocusChange, EnableBracketedPaste) {
            error!("Failed to enable terminal input modes: {}", e);
        }

        self.running.store(true, Ordering::SeqCst);
        self.events = Some(events.clone());

        let running = self.running.clone();
        let (cell_width, cell_height) = (self.cell_width, self.cell_height);
        let reader_thread = thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match event::poll(Duration::from_millis(50)) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        error!("Terminal event poll failed: {}", e);
                        break;
                    }
                }
                let ct_event = match event::read() {
                    Ok(ev) => ev,
                    Err(e) => {
                        error!("Terminal event read failed: {}", e);
                        break;
                    }
                };
                if let Some(out) = translate(ct_event, cell_width, cell_height) {
                    if !events.send(out) {
                        break;
                    }
                }
            }
            running.store(false, Ordering::SeqCst);
            debug!("Terminal event reader stopped");
        });

        self.reader_thread = Some(reader_thread);
        info!("Terminal surface listening");
    }

    fn unregister(&mut self) {
        self.events = None;
        if !self.join_reader() {
            return;
        }
        if let Err(e) = execute!(stdout(), DisableBracketedPaste, DisableFocusChange, DisableMouseCapture) {
            error!("Failed to restore terminal input modes: {}", e);
        }
        info!("Terminal surface released");
    }

    fn request_focus(&mut self) {
        // The controlling terminal already has focus; report it the way a
        // focused widget would.
        if let Some(events) = &self.events {
            events.device(DeviceEvent::Focus);
        }
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        self.unregister();
    }
}

/// Map a crossterm event onto the coordinator's vocabulary
pub fn translate(ct_event: CtEvent, cell_width: f32, cell_height: f32) -> Option<Event> {
    let device = match ct_event {
        CtEvent::Key(key) => {
            let (name, code) = key_names(key.code)?;
            let input = KeyInput {
                key: name,
                code,
                repeat: key.kind == KeyEventKind::Repeat,
                mods: Modifiers::from(key.modifiers),
            };
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => DeviceEvent::KeyDown(input),
                KeyEventKind::Release => DeviceEvent::KeyUp(input),
            }
        }
        CtEvent::Mouse(mouse) => {
            let x = mouse.column as f32 * cell_width;
            let y = mouse.row as f32 * cell_height;
            let mods = Modifiers::from(mouse.modifiers);
            let pointer = |button: MouseButton, buttons: Buttons| PointerInput {
                x,
                y,
                button,
                buttons,
                mods,
            };
            let wheel = |delta_x: f32, delta_y: f32| WheelInput {
                x,
                y,
                delta_x,
                delta_y,
                mods,
            };
            match mouse.kind {
                MouseEventKind::Down(b) => {
                    let button = MouseButton::from(b);
                    DeviceEvent::MouseDown(pointer(button, button.held()))
                }
                MouseEventKind::Up(b) => DeviceEvent::MouseUp(pointer(b.into(), Buttons::empty())),
                MouseEventKind::Drag(b) => {
                    let button = MouseButton::from(b);
                    DeviceEvent::MouseMove(pointer(button, button.held()))
                }
                MouseEventKind::Moved => {
                    DeviceEvent::MouseMove(pointer(MouseButton::Primary, Buttons::empty()))
                }
                MouseEventKind::ScrollUp => DeviceEvent::Wheel(wheel(0.0, -1.0)),
                MouseEventKind::ScrollDown => DeviceEvent::Wheel(wheel(0.0, 1.0)),
                MouseEventKind::ScrollLeft => DeviceEvent::Wheel(wheel(-1.0, 0.0)),
                MouseEventKind::ScrollRight => DeviceEvent::Wheel(wheel(1.0, 0.0)),
            }
        }
        CtEvent::Paste(text) => DeviceEvent::Paste(Some(text)),
        CtEvent::FocusGained => DeviceEvent::Focus,
        CtEvent::FocusLost => DeviceEvent::Blur,
        CtEvent::Resize(cols, rows) => {
            return Some(Event::Viewport(Viewport::new(
                cols as f32 * cell_width,
                rows as f32 * cell_height,
                1.0,
            )));
        }
    };
    Some(Event::Device(device))
}
