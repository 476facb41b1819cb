/// Layout defaults shared by the geometry and the configuration
///
/// These match the look of a typical spreadsheet: a narrow row label column
/// on the left, a one-line column label row on top.

/// Default cell width in pixels
pub const DEFAULT_CELL_WIDTH: i32 = 80;

/// Default cell height in pixels
pub const DEFAULT_CELL_HEIGHT: i32 = 20;

/// Width of the row labels on the left
pub const DEFAULT_ROW_LABEL_WIDTH: i32 = 40;

/// Height of the column labels on top
pub const DEFAULT_COL_LABEL_HEIGHT: i32 = 20;

/// Default number of rows and columns of a new grid
pub const DEFAULT_ROWS: usize = 100;
pub const DEFAULT_COLS: usize = 26;

/// Minimum cell dimension to prevent division by zero
/// Used as a fallback when cell dimensions are invalid
pub const MIN_CELL_DIMENSION: i32 = 1;
