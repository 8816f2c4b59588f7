//! Session lifecycle
//!
//! A [`SessionHandle`] owns everything that lives for one mount of the
//! terminal: the engine instance, the surface listeners, the render schedule
//! and the resize timer.
//!
//! ```text
//! Uninitialized -> Initializing -> Resolving -> Attached -> Detaching -> Detached
//! ```
//!
//! Detaching unregisters the output channel with the host but leaves the
//! PTY running, so a later mount with the same id re-attaches to the same
//! shell.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::bridge::OutputBridge;
use super::event::{EventSender, OutputSink};
use super::geometry::GeometrySync;
use super::scheduler::RenderScheduler;
use crate::config::Config;
use crate::core::engine::{Engine, EngineConfig, EngineError};
use crate::core::grid::{Geometry, Viewport};
use crate::core::host::{Host, HostError};
use crate::core::session::Session;
use crate::ui::clipboard::Clipboard;
use crate::ui::encoder::InputEncoder;
use crate::ui::input::{DeviceEvent, MousePhase};
use crate::ui::selection::{Selection, SelectionTracker};
use crate::ui::surface::Surface;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Failed to initialize engine for session {session_id}: {source}")]
    Engine {
        session_id: String,
        #[source]
        source: EngineError,
    },

    #[error("Failed to attach session {session_id}: {source}")]
    Attach {
        session_id: String,
        #[source]
        source: HostError,
    },
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Resolving,
    Attached,
    Detaching,
    Detached,
}

/// The external pieces a mount works against
pub struct Collaborators {
    pub host: Arc<dyn Host>,
    pub engine: Box<dyn Engine>,
    pub surface: Box<dyn Surface>,
    pub clipboard: Box<dyn Clipboard>,
}

pub struct SessionHandle {
    session: Session,
    state: LifecycleState,
    /// Set once teardown starts; every continuation checks it first
    disposed: bool,
    /// `Engine::init` succeeded, so the engine owns resources to destroy
    engine_ready: bool,
    /// Surface listeners are registered
    listening: bool,
    host: Arc<dyn Host>,
    engine: Box<dyn Engine>,
    surface: Box<dyn Surface>,
    clipboard: Box<dyn Clipboard>,
    bridge: OutputBridge,
    encoder: InputEncoder,
    selection: SelectionTracker,
    geometry: GeometrySync,
    scheduler: RenderScheduler,
    engine_config: EngineConfig,
    config: Config,
}

impl SessionHandle {
    /// Initialize the engine, attach to or spawn the host session, and start
    /// listening. Any failure is fatal to the mount; the engine is destroyed
    /// before the error is returned.
    pub fn mount(
        session: Session,
        parts: Collaborators,
        events: &EventSender,
        config: &Config,
        now: Instant,
    ) -> Result<Self> {
        let mut handle = Self::new(session, parts, config);
        match handle.attach(events, now) {
            Ok(()) => Ok(handle),
            Err(e) => {
                warn!("Mount of session {} failed: {}", handle.session.id, e);
                handle.detach();
                Err(e)
            }
        }
    }

    fn new(session: Session, parts: Collaborators, config: &Config) -> Self {
        let Collaborators {
            host,
            engine,
            surface,
            clipboard,
        } = parts;
        let (cell_width, cell_height) = (config.cell.width, config.cell.height);
        let viewport = surface.viewport();
        let initial = Geometry::from_viewport(viewport, cell_width, cell_height);
        let engine_config = EngineConfig {
            cols: initial.cols,
            rows: initial.rows,
            cell_width,
            cell_height,
            dpr: viewport.dpr,
            renderer_backend: config.features.renderer_backend.clone(),
            bracketed_paste: config.features.bracketed_paste,
            focus_events: config.features.focus_events,
        };

        Self {
            bridge: OutputBridge::new(session.id.clone()),
            encoder: InputEncoder::new(session.id.clone(), cell_width, cell_height),
            selection: SelectionTracker::new(),
            geometry: GeometrySync::new(session.id.clone(), initial, config.resize_debounce()),
            scheduler: RenderScheduler::new(config.frame_interval()),
            session,
            state: LifecycleState::Uninitialized,
            disposed: false,
            engine_ready: false,
            listening: false,
            host,
            engine,
            surface,
            clipboard,
            engine_config,
            config: config.clone(),
        }
    }

    fn transition(&mut self, next: LifecycleState) {
        debug!("Session {}: {:?} -> {:?}", self.session.id, self.state, next);
        self.state = next;
    }

    fn attach(&mut self, events: &EventSender, now: Instant) -> Result<()> {
        self.transition(LifecycleState::Initializing);
        let geometry = self.initialize().map_err(|source| CoordinatorError::Engine {
            session_id: self.session.id.clone(),
            source,
        })?;
        self.geometry = GeometrySync::new(self.session.id.clone(), geometry, self.config.resize_debounce());

        self.transition(LifecycleState::Resolving);
        self.resolve(geometry, events.output_sink())
            .map_err(|source| CoordinatorError::Attach {
                session_id: self.session.id.clone(),
                source,
            })?;
        self.session.alive = true;

        self.transition(LifecycleState::Attached);
        self.surface.register(events.clone());
        self.listening = true;
        self.surface.request_focus();
        self.scheduler.start(now);
        info!(
            "Session {} attached at {}x{}",
            self.session.id, geometry.cols, geometry.rows
        );
        Ok(())
    }

    /// Bring the engine up and take its fitted geometry as the starting grid
    fn initialize(&mut self) -> std::result::Result<Geometry, EngineError> {
        self.engine.init(&self.engine_config)?;
        self.engine_ready = true;
        let viewport = self.surface.viewport();
        let geometry = self
            .engine
            .fit_to_container(viewport.width, viewport.height, viewport.dpr)?
            .clamped();
        Ok(geometry)
    }

    /// Join the running PTY if the host still has it, otherwise start one
    fn resolve(&mut self, geometry: Geometry, output: OutputSink) -> std::result::Result<(), HostError> {
        let id = self.session.id.as_str();
        let sessions = self.host.list_sessions()?;
        let existing = sessions.iter().any(|s| s.id == id && s.alive);

        if existing {
            info!("Re-attaching to running session {}", id);
            self.host.attach_session(id, geometry.cols, geometry.rows, output)
        } else {
            info!("Spawning session {} (cwd {:?})", id, self.session.cwd);
            self.host
                .spawn_session(id, geometry.cols, geometry.rows, self.session.cwd.as_deref(), output)
        }
    }

    /// Tear the mount down. Never terminates the host PTY. Idempotent.
    pub fn detach(&mut self) {
        if matches!(self.state, LifecycleState::Detaching | LifecycleState::Detached) {
            return;
        }
        let was_attached = self.state == LifecycleState::Attached;
        self.transition(LifecycleState::Detaching);
        self.disposed = true;

        self.scheduler.cancel();
        self.geometry.cancel();
        if self.listening {
            self.surface.unregister();
            self.listening = false;
        }
        if was_attached {
            if let Err(e) = self.host.detach_session(&self.session.id) {
                warn!("Failed to detach session {}: {}", self.session.id, e);
            }
        }
        if self.engine_ready {
            self.engine.destroy();
            self.engine_ready = false;
        }

        self.transition(LifecycleState::Detached);
        info!("Session {} detached", self.session.id);
    }

    /// Host output arrived on the streaming channel
    pub fn on_output(&mut self, bytes: &[u8]) {
        if self.disposed {
            trace!("Dropping {} output bytes after disposal", bytes.len());
            return;
        }
        self.bridge.deliver(bytes, self.engine.as_mut(), self.host.as_ref());
    }

    /// A device listener fired
    pub fn on_device(&mut self, event: DeviceEvent) {
        if self.disposed {
            trace!("Dropping device event after disposal: {:?}", event);
            return;
        }
        let engine = self.engine.as_mut();
        let host = self.host.as_ref();
        let (cell_width, cell_height) = (self.config.cell.width, self.config.cell.height);
        let cols = self.geometry.synced().0;

        match event {
            DeviceEvent::KeyDown(key) => {
                self.encoder.key_down(&key, engine, host, self.clipboard.as_mut());
            }
            DeviceEvent::KeyUp(key) => {
                self.encoder.key_up(&key, engine, host);
            }
            DeviceEvent::MouseDown(pointer) => {
                let cell = pointer.cell(cell_width, cell_height);
                self.selection.on_mouse_down(pointer.button, cell, cols, engine);
                self.encoder.mouse(MousePhase::Down, &pointer, engine, host);
            }
            DeviceEvent::MouseUp(pointer) => {
                self.selection.on_mouse_up();
                self.encoder.mouse(MousePhase::Up, &pointer, engine, host);
            }
            DeviceEvent::MouseMove(pointer) => {
                let cell = pointer.cell(cell_width, cell_height);
                self.selection.on_mouse_move(pointer.buttons, cell, cols, engine);
                self.encoder.mouse(pointer.move_phase(), &pointer, engine, host);
            }
            DeviceEvent::Wheel(wheel) => {
                self.encoder.wheel(&wheel, engine, host);
            }
            DeviceEvent::Paste(text) => {
                self.encoder
                    .paste(text.as_deref(), engine, host, self.clipboard.as_mut());
            }
            DeviceEvent::Focus => {
                self.encoder.focus(true, engine, host);
            }
            DeviceEvent::Blur => {
                self.encoder.focus(false, engine, host);
            }
        }
    }

    /// The resize observer fired
    pub fn on_viewport(&mut self, viewport: Viewport, now: Instant) {
        if self.disposed {
            return;
        }
        self.geometry.observe(viewport, now);
    }

    /// Run whatever timers are due: the debounced resize, then the paint
    pub fn on_tick(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        if let Some(geometry) = self.geometry.poll(now, self.engine.as_mut(), self.host.as_ref()) {
            self.selection.on_cols_changed(geometry.cols, self.engine.as_mut());
        }
        self.scheduler.poll(now, self.engine.as_mut());
    }

    /// Earliest pending timer
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        match (self.scheduler.deadline(), self.geometry.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Grid size last synchronized with the host
    pub fn grid(&self) -> (u16, u16) {
        self.geometry.synced()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.selection()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.detach();
    }
}
