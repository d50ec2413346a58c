//! Row-flow packing of visible widgets onto the dashboard grid.
//!
//! The user's ordering is the only placement input: each widget keeps its
//! own width and height, but `x`/`y` are recomputed so that the dashboard
//! never has gaps or overlaps regardless of what the catalog defaults say.

use serde::Serialize;

use crate::constants::GRID_COLUMNS;
use crate::models::{GridRect, WidgetInstance};

/// A widget together with its packed grid rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedWidget {
    /// Widget key
    pub key: String,
    /// Display label
    pub label: String,
    /// Packed placement
    pub rect: GridRect,
}

/// Packs the visible widgets in display order.
///
/// Widgets flow left to right and wrap when the next one would cross the
/// right edge. A row advances by its tallest widget.
///
/// # Examples
///
/// - widths `[4, 4, 4]` → one row at `x = 0, 4, 8`
/// - widths `[6, 8]` → two rows, the second starting at `y = h(first)`
#[must_use]
pub fn pack<'a, I>(instances: I) -> Vec<PlacedWidget>
where
    I: IntoIterator<Item = &'a WidgetInstance>,
{
    let mut placed = Vec::new();
    let mut cursor_x: u16 = 0;
    let mut row_y: u16 = 0;
    let mut row_height: u16 = 0;

    for instance in instances.into_iter().filter(|i| i.visible) {
        let size = instance.position.clamped();

        if cursor_x > 0 && cursor_x + size.w > GRID_COLUMNS {
            row_y += row_height;
            cursor_x = 0;
            row_height = 0;
        }

        placed.push(PlacedWidget {
            key: instance.key.clone(),
            label: instance.label.clone(),
            rect: GridRect::new(cursor_x, row_y, size.w, size.h),
        });

        cursor_x += size.w;
        row_height = row_height.max(size.h);
    }

    placed
}

/// Total grid rows used by a packing.
#[must_use]
pub fn total_rows(placed: &[PlacedWidget]) -> u16 {
    placed.iter().map(|p| p.rect.bottom()).max().unwrap_or(0)
}
