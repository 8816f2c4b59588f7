//! Rendering engine boundary
//!
//! The terminal engine owns the character grid, cursor, selection buffer and
//! escape-sequence interpretation. The coordinator only talks to it through
//! the [`Engine`] trait.

use thiserror::Error;

use super::grid::Geometry;
use crate::ui::input::InputEvent;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Failed to initialize engine: {0}")]
    Init(String),

    #[error("Failed to fit grid to container: {0}")]
    Fit(String),

    #[error("Failed to render frame: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Fixed configuration handed to [`Engine::init`]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub cols: u16,
    pub rows: u16,
    pub cell_width: f32,
    pub cell_height: f32,
    pub dpr: f32,
    /// Renderer backend hint ("auto", "webgpu", "canvas2d", ...)
    pub renderer_backend: String,
    /// Wrap pasted text in bracketed-paste markers when the shell asks for it
    pub bracketed_paste: bool,
    /// Report focus gained/lost to the shell
    pub focus_events: bool,
}

/// Capability surface of a terminal rendering engine.
///
/// Encoding and draining never fail; initialization, fitting and painting
/// may.
pub trait Engine {
    /// Bind the engine to its drawing surface with a starting grid
    fn init(&mut self, config: &EngineConfig) -> Result<()>;

    /// Resize backing surface, visible size and logical grid at once
    fn fit_to_container(&mut self, width: f32, height: f32, dpr: f32) -> Result<Geometry>;

    /// Interpret PTY output
    fn feed(&mut self, bytes: &[u8]);

    /// Submit a structured input event for encoding
    fn input(&mut self, event: &InputEvent);

    /// Take the PTY-bound frames produced by `input`/`paste_text`
    fn drain_encoded_input_bytes(&mut self) -> Vec<Vec<u8>>;

    /// Take the query replies produced by `feed` (cursor reports etc.)
    fn drain_reply_bytes(&mut self) -> Vec<Vec<u8>>;

    /// Selected text, if a selection exists
    fn copy_selection(&mut self) -> Option<String>;

    fn clear_selection(&mut self);

    /// Select the grid-linear range `start..=end`
    fn set_selection_range(&mut self, start: u32, end: u32);

    /// Paste-aware input path (applies bracketed paste when enabled)
    fn paste_text(&mut self, text: &str);

    /// Paint one frame
    fn render(&mut self) -> Result<()>;

    /// Release the surface; no call is valid afterwards
    fn destroy(&mut self);
}
