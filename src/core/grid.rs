//! Grid geometry
//!
//! Pixel-to-cell arithmetic shared by the engine sizing, the geometry
//! synchronizer, and pointer lowering.

/// Nominal cell width in logical pixels at 1.0 DPR
pub const NOMINAL_CELL_WIDTH: f32 = 9.0;
/// Nominal cell height in logical pixels at 1.0 DPR
pub const NOMINAL_CELL_HEIGHT: f32 = 18.0;

/// Container size in logical pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self { width, height, dpr }
    }
}

/// Grid dimensions together with the cell metrics they were derived from.
///
/// `cols` and `rows` are never zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub cols: u16,
    pub rows: u16,
    pub cell_width: f32,
    pub cell_height: f32,
    pub device_pixel_ratio: f32,
}

impl Geometry {
    /// Derive a grid from a viewport: pixel size over cell size, floored,
    /// clamped to at least one cell per axis.
    pub fn from_viewport(viewport: Viewport, cell_width: f32, cell_height: f32) -> Self {
        Self {
            cols: cells_along(viewport.width, cell_width),
            rows: cells_along(viewport.height, cell_height),
            cell_width,
            cell_height,
            device_pixel_ratio: viewport.dpr,
        }
    }

    /// Enforce the `cols, rows >= 1` invariant on a geometry reported by an engine
    pub fn clamped(mut self) -> Self {
        self.cols = self.cols.max(1);
        self.rows = self.rows.max(1);
        self
    }

    /// Cell-count dimensions only
    pub fn dims(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }
}

fn cells_along(pixels: f32, cell: f32) -> u16 {
    if !pixels.is_finite() || !cell.is_finite() || cell <= 0.0 {
        return 1;
    }
    let count = (pixels / cell).floor();
    if count < 1.0 {
        1
    } else if count >= u16::MAX as f32 {
        u16::MAX
    } else {
        count as u16
    }
}

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellPos {
    pub col: u16,
    pub row: u16,
}

impl CellPos {
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Map a pointer position (logical px, relative to the surface origin)
    /// to the cell underneath it. Positions left of or above the origin map
    /// to column/row 0.
    pub fn from_pixels(x: f32, y: f32, cell_width: f32, cell_height: f32) -> Self {
        Self {
            col: cell_index(x, cell_width),
            row: cell_index(y, cell_height),
        }
    }

    /// Grid-linear index `row * cols + col`
    pub fn linear_index(&self, cols: u16) -> u32 {
        self.row as u32 * cols as u32 + self.col as u32
    }
}

fn cell_index(pixels: f32, cell: f32) -> u16 {
    if !pixels.is_finite() || cell <= 0.0 {
        return 0;
    }
    let index = (pixels / cell).floor();
    if index <= 0.0 {
        0
    } else if index >= u16::MAX as f32 {
        u16::MAX
    } else {
        index as u16
    }
}
