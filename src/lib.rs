//! termbridge - binds a terminal engine to a host-managed PTY session
//!
//! A [`Coordinator`] owns one session binding. It resolves which session to
//! show, spawns or reattaches it on the host, streams PTY output into the
//! engine, encodes device input back to the PTY, keeps the PTY grid in sync
//! with the viewport and repaints on a fixed interval.
//!
//! All work happens on the coordinator thread. Host output, device events
//! and viewport changes arrive as [`Event`]s on one queue.
//!
//! ```text
//!            ┌──────────── Event queue ────────────┐
//! Host ─────▶│ Output │ Device │ Viewport │ Unmount│────▶ Coordinator
//! Surface ──▶└─────────────────────────────────────┘        │
//!                                                           ├─▶ Engine
//!                                                           └─▶ Host
//! ```

pub mod config;
pub mod coord;
pub mod core;
pub mod logging;
pub mod ui;

#[cfg(test)]
mod testing;

pub use crate::config::Config;
pub use crate::coord::{Collaborators, Coordinator, CoordinatorError, Event, EventSender};
pub use crate::core::{resolve_initial_session, Engine, Host, Session};
