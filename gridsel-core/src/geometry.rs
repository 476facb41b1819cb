/// Grid geometry and coordinate conversion utilities
///
/// This module converts between:
/// - Grid coordinates (cells: row, column)
/// - Screen coordinates (pixels inside the grid window, after scrolling)
///
/// Screen rectangles use exclusive right/bottom edges, so two cells next to
/// each other produce rectangles that share an edge.
use std::ops::Range;

use crate::block::{Block, CellCoords, GridSize};
use crate::config::GeometryConfig;
use crate::constants::MIN_CELL_DIMENSION;

/// Largest pixel coordinate magnitude handed out in a `Rect`
const MAX_PIXEL: i64 = i32::MAX as i64 / 4;

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanning two corner points, `right`/`bottom` exclusive
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let rect = Rect::from_edges(left, top, right, bottom);
        (!rect.is_empty()).then_some(rect)
    }

    /// Smallest rectangle containing both; empty rectangles are ignored
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Corner points in clockwise order starting at the top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// Grid geometry configuration for coordinate conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Cell dimensions
    pub cell_width: i32,
    pub cell_height: i32,

    /// Space taken by the row labels on the left and column labels on top
    pub row_label_width: i32,
    pub col_label_height: i32,

    /// Window dimensions, labels included
    pub viewport_width: i32,
    pub viewport_height: i32,

    /// Scroll offset of the cell area, in pixels
    pub scroll_x: i32,
    pub scroll_y: i32,
}

impl GridGeometry {
    /// Create a geometry without labels, scrolled to the origin
    #[inline]
    pub fn new(cell_width: i32, cell_height: i32, viewport_width: i32, viewport_height: i32) -> Self {
        Self {
            cell_width: cell_width.max(MIN_CELL_DIMENSION),
            cell_height: cell_height.max(MIN_CELL_DIMENSION),
            row_label_width: 0,
            col_label_height: 0,
            viewport_width,
            viewport_height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    pub fn from_config(config: &GeometryConfig) -> Self {
        Self {
            row_label_width: config.row_label_width,
            col_label_height: config.col_label_height,
            ..Self::new(
                config.cell_width,
                config.cell_height,
                config.viewport_width,
                config.viewport_height,
            )
        }
    }

    pub fn with_labels(mut self, row_label_width: i32, col_label_height: i32) -> Self {
        self.row_label_width = row_label_width;
        self.col_label_height = col_label_height;
        self
    }

    /// Scroll the cell area so that pixel (x, y) of the grid is at its top-left
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        self.scroll_x = x.max(0);
        self.scroll_y = y.max(0);
    }

    /// Part of the window where cells are drawn
    pub fn cell_area(&self) -> Rect {
        Rect::from_edges(
            self.row_label_width,
            self.col_label_height,
            self.viewport_width,
            self.viewport_height,
        )
    }

    /// Screen rectangle of a single cell, not clipped
    #[inline]
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            to_pixels(self.col_offset(col)),
            to_pixels(self.row_offset(row)),
            self.cell_width,
            self.cell_height,
        )
    }

    /// Screen rectangle of a block, not clipped.
    ///
    /// Coordinates far outside the window saturate instead of overflowing.
    pub fn block_rect(&self, block: &Block) -> Rect {
        Rect::from_edges(
            to_pixels(self.col_offset(block.left())),
            to_pixels(self.row_offset(block.top())),
            to_pixels(self.col_offset(block.right().saturating_add(1))),
            to_pixels(self.row_offset(block.bottom().saturating_add(1))),
        )
    }

    /// Screen rectangle of a block clipped to the cell area.
    ///
    /// Returns `None` if no part of the block is scrolled into view.
    pub fn visible_block_rect(&self, block: &Block) -> Option<Rect> {
        self.block_rect(block).intersection(&self.cell_area())
    }

    /// Visible parts of all the given blocks in a grid of `size`.
    ///
    /// Blocks are cut down to the visible rows and columns first, so huge
    /// blocks never reach the pixel conversion.
    pub fn visible_rects(&self, blocks: &[Block], size: GridSize) -> Vec<Rect> {
        let rows = self.visible_rows(size.rows);
        let cols = self.visible_cols(size.cols);
        if rows.is_empty() || cols.is_empty() {
            return Vec::new();
        }
        let window = Block::new(rows.start, cols.start, rows.end - 1, cols.end - 1);

        blocks
            .iter()
            .filter_map(|block| block.intersection(&window))
            .filter_map(|block| self.visible_block_rect(&block))
            .collect()
    }

    /// Rows at least partially visible in a grid with `rows` rows
    pub fn visible_rows(&self, rows: usize) -> Range<usize> {
        let area = self.cell_area();
        visible_range(self.scroll_y, area.height, self.cell_height, rows)
    }

    /// Columns at least partially visible in a grid with `cols` columns
    pub fn visible_cols(&self, cols: usize) -> Range<usize> {
        let area = self.cell_area();
        visible_range(self.scroll_x, area.width, self.cell_width, cols)
    }

    /// Convert window pixel coordinates to the cell under them (for mouse input)
    ///
    /// # Returns
    /// - `None` if the point is over the labels or outside the window
    /// - the last row/column if the point is past the end of the grid
    pub fn pixels_to_cell(&self, x: i32, y: i32, size: GridSize) -> Option<CellCoords> {
        if size.is_empty() || !point_in(&self.cell_area(), x, y) {
            return None;
        }

        let grid_x = i64::from(x) - i64::from(self.row_label_width) + i64::from(self.scroll_x);
        let grid_y = i64::from(y) - i64::from(self.col_label_height) + i64::from(self.scroll_y);
        let col = usize::try_from(grid_x / i64::from(self.cell_width)).unwrap_or(0);
        let row = usize::try_from(grid_y / i64::from(self.cell_height)).unwrap_or(0);

        Some(CellCoords::new(
            row.min(size.rows - 1),
            col.min(size.cols - 1),
        ))
    }
}

impl GridGeometry {
    /// Window x of the left edge of column `col`
    fn col_offset(&self, col: usize) -> i64 {
        offset(self.row_label_width, col, self.cell_width, self.scroll_x)
    }

    /// Window y of the top edge of row `row`
    fn row_offset(&self, row: usize) -> i64 {
        offset(self.col_label_height, row, self.cell_height, self.scroll_y)
    }
}

fn offset(label: i32, index: usize, cell: i32, scroll: i32) -> i64 {
    let index = i64::try_from(index).unwrap_or(i64::MAX);
    i64::from(label)
        .saturating_add(index.saturating_mul(i64::from(cell)))
        .saturating_sub(i64::from(scroll))
}

/// Clamp to a range where widths and `right()`/`bottom()` can't overflow
fn to_pixels(value: i64) -> i32 {
    value.clamp(-MAX_PIXEL, MAX_PIXEL) as i32
}

fn point_in(rect: &Rect, x: i32, y: i32) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

fn visible_range(scroll: i32, extent: i32, cell: i32, count: usize) -> Range<usize> {
    if extent <= 0 {
        return 0..0;
    }
    let (scroll, extent, cell) = (i64::from(scroll), i64::from(extent), i64::from(cell));
    let first = usize::try_from(scroll / cell).unwrap_or(0);
    let last = usize::try_from((scroll + extent + cell - 1) / cell).unwrap_or(0);
    first.min(count)..last.min(count)
}
