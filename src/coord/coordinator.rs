//! Coordinator actor
//!
//! Single consumer of the event queue. Host output, device events and
//! viewport changes are applied one at a time on the coordinator thread;
//! the render and resize timers are serviced between events.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::event::{self, Event, EventSender};
use super::lifecycle::{Collaborators, Result, SessionHandle};
use crate::config::Config;
use crate::core::session::Session;

/// Upper bound on a blocking wait when no timer is pending
const IDLE_WAIT: Duration = Duration::from_millis(250);

pub struct Coordinator {
    handle: SessionHandle,
    events: Receiver<Event>,
}

impl Coordinator {
    /// Mount `session` and return the coordinator with a producer handle
    /// for the UI side (viewport changes, unmount).
    pub fn mount(session: Session, parts: Collaborators, config: &Config) -> Result<(Self, EventSender)> {
        Self::mount_at(session, parts, config, Instant::now())
    }

    pub fn mount_at(
        session: Session,
        parts: Collaborators,
        config: &Config,
        now: Instant,
    ) -> Result<(Self, EventSender)> {
        let (sender, events) = event::channel();
        let handle = SessionHandle::mount(session, parts, &sender, config, now)?;
        Ok((Self { handle, events }, sender))
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    /// Apply one event. Returns false once the session has been unmounted.
    pub fn dispatch(&mut self, event: Event, now: Instant) -> bool {
        match event {
            Event::Output(bytes) => self.handle.on_output(&bytes),
            Event::Device(device) => self.handle.on_device(device),
            Event::Viewport(viewport) => self.handle.on_viewport(viewport, now),
            Event::Unmount => {
                info!("Unmount requested for session {}", self.handle.session().id);
                self.handle.detach();
                return false;
            }
        }
        !self.handle.is_disposed()
    }

    /// Drain everything queued without blocking, then service due timers.
    /// Returns false once the session has been unmounted.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut running = !self.handle.is_disposed();
        loop {
            match self.events.try_recv() {
                Ok(event) => running = self.dispatch(event, now) && running,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    running = false;
                    break;
                }
            }
        }
        self.handle.on_tick(now);
        running
    }

    /// Block on the queue until unmounted or every producer is gone, then
    /// tear the session down.
    pub fn run(mut self) {
        loop {
            let now = Instant::now();
            let timeout = self
                .handle
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(now))
                .unwrap_or(IDLE_WAIT);

            match self.events.recv_timeout(timeout) {
                Ok(event) => {
                    if !self.dispatch(event, Instant::now()) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("All producers gone for session {}", self.handle.session().id);
                    break;
                }
            }
            // Timers also run under a continuous event stream
            self.handle.on_tick(Instant::now());
        }
        self.handle.detach();
    }
}
