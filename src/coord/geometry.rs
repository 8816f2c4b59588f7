//! Geometry synchronizer
//!
//! Debounces viewport observations, refits the engine grid and keeps the
//! host PTY's dimensions in step with it.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::core::engine::Engine;
use crate::core::grid::{Geometry, Viewport};
use crate::core::host::Host;

/// Default quiet period before a resize is applied
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

pub struct GeometrySync {
    session_id: String,
    debounce: Duration,
    /// Last (cols, rows) pushed to or reported by the host
    synced: (u16, u16),
    /// Latest observation and when it becomes due
    pending: Option<(Instant, Viewport)>,
}

impl GeometrySync {
    pub fn new(session_id: impl Into<String>, initial: Geometry, debounce: Duration) -> Self {
        Self {
            session_id: session_id.into(),
            debounce,
            synced: initial.dims(),
            pending: None,
        }
    }

    /// Record a size change; restarts the debounce timer
    pub fn observe(&mut self, viewport: Viewport, now: Instant) {
        self.pending = Some((now + self.debounce, viewport));
    }

    /// When the pending resize fires, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(deadline, _)| deadline)
    }

    /// Drop any pending resize
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn synced(&self) -> (u16, u16) {
        self.synced
    }

    /// Apply the pending resize if its timer has expired.
    ///
    /// Returns the new geometry when the cell grid actually changed.
    pub fn poll(&mut self, now: Instant, engine: &mut dyn Engine, host: &dyn Host) -> Option<Geometry> {
        let (deadline, viewport) = self.pending?;
        if now < deadline {
            return None;
        }
        self.pending = None;

        let geometry = match engine.fit_to_container(viewport.width, viewport.height, viewport.dpr) {
            Ok(geometry) => geometry.clamped(),
            Err(e) => {
                error!("fit_to_container failed for session {}: {}", self.session_id, e);
                return None;
            }
        };

        if geometry.dims() == self.synced {
            debug!(
                "Viewport {}x{}@{} keeps grid at {}x{}",
                viewport.width, viewport.height, viewport.dpr, geometry.cols, geometry.rows
            );
            return None;
        }

        info!(
            "Resize session {}: {}x{} -> {}x{}",
            self.session_id, self.synced.0, self.synced.1, geometry.cols, geometry.rows
        );
        // The engine grid already changed, so track it even if the host refuses
        self.synced = geometry.dims();
        if let Err(e) = host.resize_session(&self.session_id, geometry.cols, geometry.rows) {
            warn!("Failed to resize session {}: {}", self.session_id, e);
        }
        Some(geometry)
    }
}
