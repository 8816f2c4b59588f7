//! In-memory collaborators for unit tests.
//!
//! Each fake is a cheap clone over shared state, so a test can hand one copy
//! to the coordinator and keep another to inspect what happened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::coord::event::{Event, EventSender, OutputSink};
use crate::coord::lifecycle::Collaborators;
use crate::core::engine::{self, Engine, EngineConfig, EngineError};
use crate::core::grid::{Geometry, Viewport, NOMINAL_CELL_HEIGHT, NOMINAL_CELL_WIDTH};
use crate::core::host::{self, Host, HostError, SavedSession, SessionInfo};
use crate::ui::clipboard::{self, Clipboard};
use crate::ui::input::{DeviceEvent, InputEvent, KeyPhase, Modifiers};
use crate::ui::surface::Surface;

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Wire the fakes into a mount
pub fn parts(host: &FakeHost, engine: &FakeEngine, surface: &FakeSurface) -> Collaborators {
    Collaborators {
        host: Arc::new(host.clone()),
        engine: Box::new(engine.clone()),
        surface: Box::new(surface.clone()),
        clipboard: Box::new(FakeClipboard::new()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    ListSaved,
    ListSessions,
    Spawn(String, u16, u16, Option<String>),
    Attach(String, u16, u16),
    Detach(String),
    Write(String, Vec<u8>),
    Resize(String, u16, u16),
}

pub struct HostState {
    saved: host::Result<Vec<SavedSession>>,
    sessions: Vec<SessionInfo>,
    sinks: HashMap<String, OutputSink>,
    calls: Vec<HostCall>,
    list_error: Option<HostError>,
    spawn_error: Option<HostError>,
    attach_error: Option<HostError>,
    write_error: Option<HostError>,
    resize_error: Option<HostError>,
}

#[derive(Clone)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                saved: Ok(Vec::new()),
                sessions: Vec::new(),
                sinks: HashMap::new(),
                calls: Vec::new(),
                list_error: None,
                spawn_error: None,
                attach_error: None,
                write_error: None,
                resize_error: None,
            })),
        }
    }

    pub fn set_saved(&self, saved: host::Result<Vec<SavedSession>>) {
        lock(&self.state).saved = saved;
    }

    pub fn set_list_error(&self, error: Option<HostError>) {
        lock(&self.state).list_error = error;
    }

    pub fn set_attach_error(&self, error: Option<HostError>) {
        lock(&self.state).attach_error = error;
    }

    pub fn set_resize_error(&self, error: Option<HostError>) {
        lock(&self.state).resize_error = error;
    }

    pub fn set_spawn_error(&self, error: Option<HostError>) {
        lock(&self.state).spawn_error = error;
    }

    pub fn set_write_error(&self, error: Option<HostError>) {
        lock(&self.state).write_error = error;
    }

    pub fn add_session(&self, id: &str, alive: bool) {
        lock(&self.state).sessions.push(SessionInfo {
            id: id.to_string(),
            alive,
        });
    }

    pub fn is_alive(&self, id: &str) -> bool {
        lock(&self.state).sessions.iter().any(|s| s.id == id && s.alive)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.state).calls.clone()
    }

    pub fn sink(&self, id: &str) -> Option<OutputSink> {
        lock(&self.state).sinks.get(id).cloned()
    }

    /// Push PTY output to whoever is attached to `id`
    pub fn emit(&self, id: &str, bytes: Vec<u8>) -> bool {
        match self.sink(id) {
            Some(sink) => sink.send(bytes),
            None => false,
        }
    }

    fn record(&self, call: HostCall) -> MutexGuard<'_, HostState> {
        let mut state = lock(&self.state);
        state.calls.push(call);
        state
    }
}

impl Host for FakeHost {
    fn list_saved_sessions(&self) -> host::Result<Vec<SavedSession>> {
        self.record(HostCall::ListSaved).saved.clone()
    }

    fn list_sessions(&self) -> host::Result<Vec<SessionInfo>> {
        let state = self.record(HostCall::ListSessions);
        match state.list_error.clone() {
            Some(e) => Err(e),
            None => Ok(state.sessions.clone()),
        }
    }

    fn spawn_session(
        &self,
        session_id: &str,
        cols: u16,
        rows: u16,
        cwd: Option<&str>,
        output: OutputSink,
    ) -> host::Result<()> {
        let mut state = self.record(HostCall::Spawn(
            session_id.to_string(),
            cols,
            rows,
            cwd.map(str::to_string),
        ));
        if let Some(e) = state.spawn_error.clone() {
            return Err(e);
        }
        state.sessions.retain(|s| s.id != session_id);
        state.sessions.push(SessionInfo {
            id: session_id.to_string(),
            alive: true,
        });
        state.sinks.insert(session_id.to_string(), output);
        Ok(())
    }

    fn attach_session(&self, session_id: &str, cols: u16, rows: u16, output: OutputSink) -> host::Result<()> {
        let mut state = self.record(HostCall::Attach(session_id.to_string(), cols, rows));
        if let Some(e) = state.attach_error.clone() {
            return Err(e);
        }
        if !state.sessions.iter().any(|s| s.id == session_id && s.alive) {
            return Err(HostError::NotFound(session_id.to_string()));
        }
        state.sinks.insert(session_id.to_string(), output);
        Ok(())
    }

    fn detach_session(&self, session_id: &str) -> host::Result<()> {
        let mut state = self.record(HostCall::Detach(session_id.to_string()));
        state.sinks.remove(session_id);
        Ok(())
    }

    fn write_input(&self, session_id: &str, data: &[u8]) -> host::Result<()> {
        let state = self.record(HostCall::Write(session_id.to_string(), data.to_vec()));
        match state.write_error.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn resize_session(&self, session_id: &str, cols: u16, rows: u16) -> host::Result<()> {
        let state = self.record(HostCall::Resize(session_id.to_string(), cols, rows));
        match state.resize_error.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct EngineState {
    pub config: Option<EngineConfig>,
    pub init_error: Option<EngineError>,
    pub fit_error: Option<EngineError>,
    /// Number of upcoming paints that fail
    pub render_errors: usize,
    pub fits: usize,
    pub renders: usize,
    pub fed: Vec<Vec<u8>>,
    pub inputs: Vec<InputEvent>,
    pub pasted: Vec<String>,
    pub pending_input: Vec<Vec<u8>>,
    pub pending_replies: Vec<Vec<u8>>,
    pub selection: Option<(u32, u32)>,
    pub selection_updates: Vec<(u32, u32)>,
    /// Grid contents, row-major
    pub screen: Vec<char>,
    pub destroyed: bool,
    /// Every trait call, of any kind
    pub calls: usize,
}

impl EngineState {
    /// Lay `lines` out on a grid `cols` wide
    pub fn set_screen(&mut self, cols: usize, lines: &[&str]) {
        self.screen.clear();
        for line in lines {
            let mut row: Vec<char> = line.chars().take(cols).collect();
            row.resize(cols, ' ');
            self.screen.extend(row);
        }
    }

    fn focus_events(&self) -> bool {
        self.config.as_ref().map_or(true, |c| c.focus_events)
    }

    fn bracketed_paste(&self) -> bool {
        self.config.as_ref().map_or(true, |c| c.bracketed_paste)
    }

    fn paste(&mut self, text: &str) {
        self.pasted.push(text.to_string());
        let bytes = if self.bracketed_paste() {
            format!("\x1b[200~{}\x1b[201~", text).into_bytes()
        } else {
            text.as_bytes().to_vec()
        };
        self.pending_input.push(bytes);
    }
}

/// Engine that records calls and encodes a small subset of xterm input
#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<EngineState>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, EngineState> {
        lock(&self.state)
    }

    fn call(&self) -> MutexGuard<'_, EngineState> {
        let mut state = lock(&self.state);
        state.calls += 1;
        state
    }
}

fn encode_key(key: &str, mods: Modifiers) -> Option<Vec<u8>> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if mods.contains(Modifiers::CTRL) && ch.is_ascii_alphabetic() => {
            Some(vec![(ch.to_ascii_lowercase() as u8) - b'a' + 1])
        }
        (Some(ch), None) => Some(ch.to_string().into_bytes()),
        _ => match key {
            "Enter" => Some(vec![0x0D]),
            "Escape" => Some(vec![0x1B]),
            "ArrowUp" => Some(b"\x1b[A".to_vec()),
            _ => None,
        },
    }
}

impl Engine for FakeEngine {
    fn init(&mut self, config: &EngineConfig) -> engine::Result<()> {
        let mut state = self.call();
        if let Some(e) = state.init_error.clone() {
            return Err(e);
        }
        state.config = Some(config.clone());
        Ok(())
    }

    fn fit_to_container(&mut self, width: f32, height: f32, dpr: f32) -> engine::Result<Geometry> {
        let mut state = self.call();
        state.fits += 1;
        if let Some(e) = state.fit_error.clone() {
            return Err(e);
        }
        let (cell_width, cell_height) = state
            .config
            .as_ref()
            .map_or((NOMINAL_CELL_WIDTH, NOMINAL_CELL_HEIGHT), |c| (c.cell_width, c.cell_height));
        Ok(Geometry::from_viewport(Viewport::new(width, height, dpr), cell_width, cell_height))
    }

    fn feed(&mut self, bytes: &[u8]) {
        let mut state = self.call();
        state.fed.push(bytes.to_vec());
        if bytes.windows(4).any(|w| w == b"\x1b[6n") {
            state.pending_replies.push(b"\x1b[1;1R".to_vec());
        }
    }

    fn input(&mut self, event: &InputEvent) {
        let mut state = self.call();
        state.inputs.push(event.clone());
        let encoded = match event {
            InputEvent::Key {
                phase: KeyPhase::Down,
                key,
                mods,
                ..
            } => encode_key(key, *mods),
            InputEvent::Focus { focused } if state.focus_events() => {
                Some(if *focused { b"\x1b[I".to_vec() } else { b"\x1b[O".to_vec() })
            }
            InputEvent::Paste { text } => {
                let text = text.clone();
                state.paste(&text);
                None
            }
            _ => None,
        };
        if let Some(bytes) = encoded {
            state.pending_input.push(bytes);
        }
    }

    fn drain_encoded_input_bytes(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.call().pending_input)
    }

    fn drain_reply_bytes(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.call().pending_replies)
    }

    fn copy_selection(&mut self) -> Option<String> {
        let state = self.call();
        let (start, end) = state.selection?;
        let (lo, hi) = (start.min(end) as usize, start.max(end) as usize);
        if lo >= state.screen.len() {
            return None;
        }
        let hi = hi.min(state.screen.len() - 1);
        Some(state.screen[lo..=hi].iter().collect())
    }

    fn clear_selection(&mut self) {
        self.call().selection = None;
    }

    fn set_selection_range(&mut self, start: u32, end: u32) {
        let mut state = self.call();
        state.selection = Some((start, end));
        state.selection_updates.push((start, end));
    }

    fn paste_text(&mut self, text: &str) {
        self.call().paste(text);
    }

    fn render(&mut self) -> engine::Result<()> {
        let mut state = self.call();
        state.renders += 1;
        if state.render_errors > 0 {
            state.render_errors -= 1;
            return Err(EngineError::Render("lost context".to_string()));
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.call().destroyed = true;
    }
}

pub struct SurfaceState {
    pub viewport: Viewport,
    pub events: Option<EventSender>,
    pub registrations: usize,
    pub unregistrations: usize,
    pub focus_requests: usize,
}

/// Surface that answers `request_focus` with a focus event, like a widget
/// gaining keyboard focus
#[derive(Clone)]
pub struct FakeSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl FakeSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            state: Arc::new(Mutex::new(SurfaceState {
                viewport: Viewport::new(width, height, 1.0),
                events: None,
                registrations: 0,
                unregistrations: 0,
                focus_requests: 0,
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, SurfaceState> {
        lock(&self.state)
    }

    fn send(&self, event: Event) -> bool {
        let events = lock(&self.state).events.clone();
        events.map_or(false, |events| events.send(event))
    }

    /// Fire a device listener
    pub fn emit(&self, event: DeviceEvent) -> bool {
        self.send(Event::Device(event))
    }

    /// Change the container size and notify the observer
    pub fn resize(&self, viewport: Viewport) -> bool {
        lock(&self.state).viewport = viewport;
        self.send(Event::Viewport(viewport))
    }
}

impl Surface for FakeSurface {
    fn viewport(&self) -> Viewport {
        lock(&self.state).viewport
    }

    fn register(&mut self, events: EventSender) {
        let mut state = lock(&self.state);
        state.events = Some(events);
        state.registrations += 1;
    }

    fn unregister(&mut self) {
        let mut state = lock(&self.state);
        if state.events.take().is_some() {
            state.unregistrations += 1;
        }
    }

    fn request_focus(&mut self) {
        lock(&self.state).focus_requests += 1;
        self.emit(DeviceEvent::Focus);
    }
}

#[derive(Default)]
struct ClipboardState {
    contents: String,
    written: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeClipboard {
    state: Arc<Mutex<ClipboardState>>,
}

impl FakeClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_contents(&self, text: &str) {
        lock(&self.state).contents = text.to_string();
    }

    pub fn written(&self) -> Vec<String> {
        lock(&self.state).written.clone()
    }
}

impl Clipboard for FakeClipboard {
    fn get_text(&mut self) -> clipboard::Result<String> {
        Ok(lock(&self.state).contents.clone())
    }

    fn set_text(&mut self, text: &str) -> clipboard::Result<()> {
        let mut state = lock(&self.state);
        state.contents = text.to_string();
        state.written.push(text.to_string());
        Ok(())
    }
}
