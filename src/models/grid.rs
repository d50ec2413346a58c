//! Grid rectangles for widget placement.

use serde::{Deserialize, Serialize};

use crate::constants::{GRID_COLUMNS, MAX_WIDGET_HEIGHT};

/// Rectangle in abstract dashboard grid units.
///
/// The dashboard grid is [`GRID_COLUMNS`] wide and unbounded vertically.
/// Field names follow the persisted layout format (`x`, `y`, `w`, `h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    /// Column of the left edge (0-based)
    pub x: u16,
    /// Row of the top edge (0-based)
    pub y: u16,
    /// Width in columns
    pub w: u16,
    /// Height in rows
    pub h: u16,
}

impl GridRect {
    /// Creates a new grid rectangle.
    #[must_use]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Column just past the right edge.
    #[must_use]
    pub const fn right(&self) -> u16 {
        self.x + self.w
    }

    /// Row just past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u16 {
        self.y + self.h
    }

    /// Returns a copy constrained to the dashboard grid.
    ///
    /// Width is kept within `1..=GRID_COLUMNS`, height within
    /// `1..=MAX_WIDGET_HEIGHT`, and `x` is pulled left so the rectangle
    /// never crosses the right edge.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let w = self.w.clamp(1, GRID_COLUMNS);
        let h = self.h.clamp(1, MAX_WIDGET_HEIGHT);
        let x = self.x.min(GRID_COLUMNS - w);
        Self { x, y: self.y, w, h }
    }

    /// Returns a copy with width and height adjusted by the given deltas, then clamped.
    #[must_use]
    pub fn resized(&self, dw: i16, dh: i16) -> Self {
        let w = (i32::from(self.w) + i32::from(dw)).max(1);
        let h = (i32::from(self.h) + i32::from(dh)).max(1);
        Self {
            x: self.x,
            y: self.y,
            w: u16::try_from(w).unwrap_or(GRID_COLUMNS),
            h: u16::try_from(h).unwrap_or(MAX_WIDGET_HEIGHT),
        }
        .clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_keeps_valid_rect() {
        let rect = GridRect::new(3, 2, 4, 3);
        assert_eq!(rect.clamped(), rect);
    }

    #[test]
    fn test_clamped_pulls_x_left() {
        let rect = GridRect::new(10, 0, 4, 2).clamped();
        assert_eq!(rect, GridRect::new(8, 0, 4, 2));
        assert_eq!(rect.right(), GRID_COLUMNS);
    }

    #[test]
    fn test_clamped_limits_size() {
        let rect = GridRect::new(0, 0, 40, 0).clamped();
        assert_eq!(rect.w, GRID_COLUMNS);
        assert_eq!(rect.h, 1);
    }

    #[test]
    fn test_resized_never_below_one() {
        let rect = GridRect::new(0, 0, 1, 1).resized(-3, -3);
        assert_eq!((rect.w, rect.h), (1, 1));

        let rect = GridRect::new(0, 0, 3, 2).resized(1, 1);
        assert_eq!((rect.w, rect.h), (4, 3));
    }
}
