//! River geometry.
//!
//! The river is a straight diagonal band running from `bottom_fraction` of
//! the width on the last row to `top_fraction` of the width on row 0.

use crate::grid::Grid;
use grove_core::{Location, Occupant, RiverConfig};
use tracing::trace;

/// Cells covered by the river on a `depth` x `width` grid, row by row
pub fn river_cells(depth: i32, width: i32, config: &RiverConfig) -> Vec<Location> {
    if depth <= 0 || width <= 0 {
        return Vec::new();
    }
    let band = config.band_width(width) as i64;
    let bottom_col = (config.bottom_fraction * width as f64) as i64;
    let top_col = (config.top_fraction * width as f64) as i64;
    let span = (depth as i64 - 1).max(1);

    let mut cells = Vec::new();
    for row in 0..depth {
        let rows_up = depth as i64 - 1 - row as i64;
        let centre = bottom_col + (top_col - bottom_col) * rows_up / span;
        for col in centre..centre + band {
            if (0..width as i64).contains(&col) {
                cells.push(Location::new(row, col as i32));
            }
        }
    }
    cells
}

/// Put river on every free cell in `cells`. Cells held by an agent or
/// already holding river are left alone. Returns how many cells changed.
pub fn stamp_river(grid: &mut Grid, cells: &[Location]) -> usize {
    let mut stamped = 0;
    for &loc in cells {
        if grid.is_free(loc) {
            grid.place(Occupant::River, loc);
            stamped += 1;
        }
    }
    trace!(stamped, total = cells.len(), "River stamped");
    stamped
}
