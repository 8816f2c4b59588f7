//! Session identity
//!
//! Resolves which logical session the terminal joins at startup.

use tracing::{info, warn};

use super::host::Host;

/// Id used when the host has nothing saved
pub const DEFAULT_SESSION_ID: &str = "default";

/// A logical terminal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Stable id, chosen once per terminal tab
    pub id: String,
    /// Working directory to seed a new PTY with
    pub cwd: Option<String>,
    /// Host-side PTY liveness (independent of UI mount state)
    pub alive: bool,
}

impl Session {
    pub fn new(id: impl Into<String>, cwd: Option<String>) -> Self {
        Self {
            id: id.into(),
            cwd,
            alive: false,
        }
    }
}

/// Pick the session to mount at startup.
///
/// The first saved session wins. An empty list or a failed query falls back
/// to `default_id` with no working directory; failures are logged, never
/// returned.
pub fn resolve_initial_session(host: &dyn Host, default_id: &str) -> Session {
    match host.list_saved_sessions() {
        Ok(saved) => match saved.into_iter().next() {
            Some(first) => {
                info!("Restoring saved session {} (shell {}, cwd {})", first.id, first.shell, first.cwd);
                Session::new(first.id, Some(first.cwd))
            }
            None => {
                info!("No saved sessions, using {}", default_id);
                Session::new(default_id, None)
            }
        },
        Err(e) => {
            warn!("Failed to read saved sessions, using {}: {}", default_id, e);
            Session::new(default_id, None)
        }
    }
}
