//! Output bridge
//!
//! Feeds host PTY output into the engine and forwards the engine's query
//! replies straight back to the host.

use tracing::{trace, warn};

use crate::core::engine::Engine;
use crate::core::host::Host;

/// Outcome of writing a batch of frames to the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub frames: usize,
    pub bytes: usize,
    pub failed: usize,
}

/// Write non-empty frames to the PTY input in order.
///
/// A failed write is logged and dropped; it never aborts the remaining
/// frames.
pub fn write_frames(host: &dyn Host, session_id: &str, frames: Vec<Vec<u8>>) -> FlushStats {
    let mut stats = FlushStats::default();
    for frame in frames {
        if frame.is_empty() {
            continue;
        }
        stats.frames += 1;
        stats.bytes += frame.len();
        if let Err(e) = host.write_input(session_id, &frame) {
            stats.failed += 1;
            warn!("Failed to write {} bytes to session {}: {}", frame.len(), session_id, e);
        }
    }
    stats
}

pub struct OutputBridge {
    session_id: String,
    messages: u64,
}

impl OutputBridge {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: 0,
        }
    }

    /// Interpret one output message, then flush the replies it provoked
    pub fn deliver(&mut self, bytes: &[u8], engine: &mut dyn Engine, host: &dyn Host) -> FlushStats {
        self.messages += 1;
        trace!("Output message {} ({} bytes)", self.messages, bytes.len());
        engine.feed(bytes);
        write_frames(host, &self.session_id, engine.drain_reply_bytes())
    }

    /// Messages delivered so far
    pub fn messages(&self) -> u64 {
        self.messages
    }
}
