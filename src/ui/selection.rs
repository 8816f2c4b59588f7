//! Mouse-driven text selection
//!
//! Indices are grid-linear (`row * cols + col`) and only valid for the
//! column count they were computed with.

use tracing::debug;

use crate::core::engine::Engine;
use crate::core::grid::CellPos;
use crate::ui::input::{Buttons, MouseButton};

/// Committed or in-progress selection range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start_index: u32,
    pub end_index: u32,
    /// Primary button still held
    pub active: bool,
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    start: Option<u32>,
    end: Option<u32>,
    dragging: bool,
    /// Column count the indices were computed with
    cols: u16,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary press starts a new selection and clears the old one
    pub fn on_mouse_down(&mut self, button: MouseButton, cell: CellPos, cols: u16, engine: &mut dyn Engine) {
        if button != MouseButton::Primary {
            return;
        }
        self.start = Some(cell.linear_index(cols));
        self.end = None;
        self.dragging = true;
        self.cols = cols;
        engine.clear_selection();
    }

    /// Extend the highlight while only the primary button is held
    pub fn on_mouse_move(&mut self, buttons: Buttons, cell: CellPos, cols: u16, engine: &mut dyn Engine) {
        if !self.dragging || buttons != Buttons::PRIMARY {
            return;
        }
        if cols != self.cols {
            self.invalidate(cols, engine);
            return;
        }
        let Some(start) = self.start else {
            return;
        };
        let end = cell.linear_index(cols);
        self.end = Some(end);
        engine.set_selection_range(start, end);
    }

    /// Release ends the drag; the committed range stays
    pub fn on_mouse_up(&mut self) {
        self.dragging = false;
    }

    /// Column count changed: every stored index is stale
    pub fn on_cols_changed(&mut self, cols: u16, engine: &mut dyn Engine) {
        if cols != self.cols && (self.start.is_some() || self.dragging) {
            self.invalidate(cols, engine);
        }
        self.cols = cols;
    }

    fn invalidate(&mut self, cols: u16, engine: &mut dyn Engine) {
        debug!("Selection dropped: grid width {} -> {}", self.cols, cols);
        self.start = None;
        self.end = None;
        self.dragging = false;
        self.cols = cols;
        engine.clear_selection();
    }

    pub fn selection(&self) -> Option<Selection> {
        match (self.start, self.end) {
            (Some(start_index), Some(end_index)) => Some(Selection {
                start_index,
                end_index,
                active: self.dragging,
            }),
            _ => None,
        }
    }
}
