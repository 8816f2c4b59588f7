//! Host process-management boundary
//!
//! The host owns the PTY child processes. The coordinator attaches to and
//! detaches from them but never terminates one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::event::OutputSink;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Host command {command} failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },

    #[error("Host is unreachable")]
    Unreachable,
}

pub type Result<T> = std::result::Result<T, HostError>;

/// A session persisted by the host across application launches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    pub id: String,
    pub shell: String,
    pub cwd: String,
}

/// Liveness of a session the host currently knows about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub alive: bool,
}

/// Request/response commands of the host service, each a blocking round
/// trip issued against a session id.
pub trait Host {
    fn list_saved_sessions(&self) -> Result<Vec<SavedSession>>;

    fn list_sessions(&self) -> Result<Vec<SessionInfo>>;

    /// Start a new PTY and stream its output into `output`
    fn spawn_session(
        &self,
        session_id: &str,
        cols: u16,
        rows: u16,
        cwd: Option<&str>,
        output: OutputSink,
    ) -> Result<()>;

    /// Join an already running PTY and stream its output into `output`
    fn attach_session(&self, session_id: &str, cols: u16, rows: u16, output: OutputSink) -> Result<()>;

    /// Unregister the output channel. The PTY keeps running.
    fn detach_session(&self, session_id: &str) -> Result<()>;

    fn write_input(&self, session_id: &str, data: &[u8]) -> Result<()>;

    fn resize_session(&self, session_id: &str, cols: u16, rows: u16) -> Result<()>;
}
