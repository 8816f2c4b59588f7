//! Boundaries to the collaborators the coordinator drives.
//!
//! - **engine**: the terminal rendering/emulation engine
//! - **host**: the host process-management service owning PTYs
//! - **grid**: pixel/cell geometry shared by both
//! - **session**: session identity and startup resolution
//!
//! # Data flow
//!
//! ```text
//! Host PTY ──bytes──▶ Engine.feed ──replies──▶ Host.write_input
//! Device ──InputEvent──▶ Engine.input ──encoded──▶ Host.write_input
//! ```

pub mod engine;
pub mod grid;
pub mod host;
pub mod session;

pub use engine::{Engine, EngineConfig, EngineError};
pub use grid::{CellPos, Geometry, Viewport};
pub use host::{Host, HostError, SavedSession, SessionInfo};
pub use session::{resolve_initial_session, Session, DEFAULT_SESSION_ID};
