//! Rectangle math for panel regions.

use serde::{Deserialize, Serialize};

/// A rectangle defined by its top-left corner and dimensions, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Column of the left edge.
    pub x: u16,
    /// Row of the top edge.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Split horizontally (top/bottom) at `ratio` (0.0–1.0).
    ///
    /// Both halves keep at least one row unless the rectangle is shorter than
    /// two rows. Returns `(top, bottom)`.
    pub fn split_horizontal(&self, ratio: f32) -> (Rect, Rect) {
        let top_h = (self.height as f32 * ratio.clamp(0.0, 1.0)) as u16;
        let top_h = top_h.max(1).min(self.height.saturating_sub(1));
        let bottom_h = self.height.saturating_sub(top_h);

        let top = Rect::new(self.x, self.y, self.width, top_h);
        let bottom = Rect::new(self.x, self.y.saturating_add(top_h), self.width, bottom_h);
        (top, bottom)
    }
}
