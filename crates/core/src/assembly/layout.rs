#![forbid(unsafe_code)]

pub const GRID_COLUMNS: usize = 4;
pub const GRID_COLUMN_WIDTH: f64 = 220.0;
pub const GRID_ROW_HEIGHT: f64 = 180.0;

/// Default canvas position of the `index`-th generated node (0-based).
pub fn grid_position(index: usize) -> (f64, f64) {
    let column = index % GRID_COLUMNS;
    let row = index / GRID_COLUMNS;
    (
        column as f64 * GRID_COLUMN_WIDTH,
        row as f64 * GRID_ROW_HEIGHT,
    )
}
