/// Rectangular blocks of grid cells
use std::fmt;

/// Coordinates of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCoords {
    pub row: usize,
    pub col: usize,
}

impl CellCoords {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Number of rows and columns in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Block spanning every cell, `None` for an empty grid
    pub fn full_block(&self) -> Option<Block> {
        if self.is_empty() {
            return None;
        }
        Some(Block::new(0, 0, self.rows - 1, self.cols - 1))
    }

    pub fn contains(&self, coords: CellCoords) -> bool {
        coords.row < self.rows && coords.col < self.cols
    }
}

/// A rectangular block of cells, bounds inclusive on all sides.
///
/// Always normalized: `top <= bottom` and `left <= right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
}

impl Block {
    /// Create a block from two opposite corners given in any order
    pub fn new(row1: usize, col1: usize, row2: usize, col2: usize) -> Self {
        Self {
            top: row1.min(row2),
            left: col1.min(col2),
            bottom: row1.max(row2),
            right: col1.max(col2),
        }
    }

    pub fn from_corners(a: CellCoords, b: CellCoords) -> Self {
        Self::new(a.row, a.col, b.row, b.col)
    }

    /// Block covering a single cell
    pub fn cell(coords: CellCoords) -> Self {
        Self::new(coords.row, coords.col, coords.row, coords.col)
    }

    /// Block covering a whole row of a grid with `cols` columns
    pub fn row(row: usize, cols: usize) -> Self {
        Self::new(row, 0, row, cols.saturating_sub(1))
    }

    /// Block covering a whole column of a grid with `rows` rows
    pub fn col(col: usize, rows: usize) -> Self {
        Self::new(0, col, rows.saturating_sub(1), col)
    }

    #[inline]
    pub fn top(&self) -> usize {
        self.top
    }

    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.bottom
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.right
    }

    pub fn top_left(&self) -> CellCoords {
        CellCoords::new(self.top, self.left)
    }

    pub fn bottom_right(&self) -> CellCoords {
        CellCoords::new(self.bottom, self.right)
    }

    pub fn row_count(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn col_count(&self) -> usize {
        self.right - self.left + 1
    }

    /// Check if the cell at (row, col) lies within the block
    #[inline]
    pub fn contains_cell(&self, row: usize, col: usize) -> bool {
        row >= self.top && row <= self.bottom && col >= self.left && col <= self.right
    }

    /// Check if `other` lies entirely within this block
    #[inline]
    pub fn contains(&self, other: &Block) -> bool {
        other.top >= self.top
            && other.bottom <= self.bottom
            && other.left >= self.left
            && other.right <= self.right
    }

    pub fn intersects(&self, other: &Block) -> bool {
        self.top <= other.bottom
            && other.top <= self.bottom
            && self.left <= other.right
            && other.left <= self.right
    }

    pub fn intersection(&self, other: &Block) -> Option<Block> {
        if !self.intersects(other) {
            return None;
        }
        Some(Block {
            top: self.top.max(other.top),
            left: self.left.max(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.min(other.right),
        })
    }

    /// Union of two blocks if it is itself a rectangle.
    ///
    /// That is the case when one block contains the other, or when both share
    /// the same row span (or column span) and their other ranges touch or
    /// overlap.
    pub fn try_union(&self, other: &Block) -> Option<Block> {
        if self.contains(other) {
            return Some(*self);
        }
        if other.contains(self) {
            return Some(*other);
        }

        let same_rows = self.top == other.top && self.bottom == other.bottom;
        let same_cols = self.left == other.left && self.right == other.right;

        if same_rows && ranges_touch(self.left, self.right, other.left, other.right) {
            return Some(Block {
                left: self.left.min(other.left),
                right: self.right.max(other.right),
                ..*self
            });
        }
        if same_cols && ranges_touch(self.top, self.bottom, other.top, other.bottom) {
            return Some(Block {
                top: self.top.min(other.top),
                bottom: self.bottom.max(other.bottom),
                ..*self
            });
        }
        None
    }

    /// Cells of this block not covered by `other`, as up to four disjoint blocks.
    ///
    /// Full-width bands above and below `other` come first, then the pieces
    /// left and right of it within the shared rows.
    pub fn difference(&self, other: &Block) -> Vec<Block> {
        let Some(hole) = self.intersection(other) else {
            return vec![*self];
        };

        let mut parts = Vec::with_capacity(4);
        if hole.top > self.top {
            parts.push(Block { bottom: hole.top - 1, ..*self });
        }
        if hole.bottom < self.bottom {
            parts.push(Block { top: hole.bottom + 1, ..*self });
        }
        if hole.left > self.left {
            parts.push(Block {
                top: hole.top,
                bottom: hole.bottom,
                left: self.left,
                right: hole.left - 1,
            });
        }
        if hole.right < self.right {
            parts.push(Block {
                top: hole.top,
                bottom: hole.bottom,
                left: hole.right + 1,
                right: self.right,
            });
        }
        parts
    }

    pub fn is_single_cell(&self) -> bool {
        self.top == self.bottom && self.left == self.right
    }

    /// Check if the block spans every column of a grid with `cols` columns
    pub fn is_full_row(&self, cols: usize) -> bool {
        self.left == 0 && self.right.checked_add(1) == Some(cols)
    }

    /// Check if the block spans every row of a grid with `rows` rows
    pub fn is_full_col(&self, rows: usize) -> bool {
        self.top == 0 && self.bottom.checked_add(1) == Some(rows)
    }

    pub(crate) fn with_rows(&self, top: usize, bottom: usize) -> Block {
        Block::new(top, self.left, bottom, self.right)
    }

    pub(crate) fn with_cols(&self, left: usize, right: usize) -> Block {
        Block::new(self.top, left, self.bottom, right)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.top_left(), self.bottom_right())
    }
}

/// Inclusive ranges overlap or sit next to each other
#[inline]
fn ranges_touch(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_start <= b_end + 1 && b_start <= a_end + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let block = Block::new(4, 6, 2, 1);
        assert_eq!(block.top_left(), CellCoords::new(2, 1));
        assert_eq!(block.bottom_right(), CellCoords::new(4, 6));
        assert_eq!(block, Block::new(2, 1, 4, 6));
    }

    #[test]
    fn test_contains_cell() {
        let block = Block::new(1, 1, 3, 3);
        assert!(block.contains_cell(1, 1));
        assert!(block.contains_cell(3, 3));
        assert!(block.contains_cell(2, 2));
        assert!(!block.contains_cell(0, 2));
        assert!(!block.contains_cell(2, 4));
    }

    #[test]
    fn test_contains_block_is_inclusive() {
        let outer = Block::new(0, 0, 10, 10);
        assert!(outer.contains(&Block::new(3, 3, 5, 5)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&Block::new(3, 3, 11, 5)));
        assert!(!Block::new(3, 3, 5, 5).contains(&outer));
    }

    #[test]
    fn test_union_same_rows_adjacent() {
        let a = Block::new(2, 2, 4, 4);
        let b = Block::new(2, 5, 4, 6);
        assert_eq!(a.try_union(&b), Some(Block::new(2, 2, 4, 6)));
        assert_eq!(b.try_union(&a), Some(Block::new(2, 2, 4, 6)));
    }

    #[test]
    fn test_union_same_cols_overlapping() {
        let a = Block::new(0, 3, 5, 3);
        let b = Block::new(4, 3, 9, 3);
        assert_eq!(a.try_union(&b), Some(Block::new(0, 3, 9, 3)));
    }

    #[test]
    fn test_union_rejects_gap_and_mismatched_span() {
        // Gap of one column
        assert_eq!(Block::new(0, 0, 1, 1).try_union(&Block::new(0, 3, 1, 4)), None);
        // Touching but different row spans
        assert_eq!(Block::new(0, 0, 1, 1).try_union(&Block::new(0, 2, 2, 3)), None);
        // Diagonal neighbours
        assert_eq!(Block::new(0, 0, 0, 0).try_union(&Block::new(1, 1, 1, 1)), None);
    }

    #[test]
    fn test_difference_hole_in_middle() {
        let block = Block::new(0, 0, 4, 4);
        let parts = block.difference(&Block::new(2, 2, 2, 2));
        assert_eq!(
            parts,
            vec![
                Block::new(0, 0, 1, 4),
                Block::new(3, 0, 4, 4),
                Block::new(2, 0, 2, 1),
                Block::new(2, 3, 2, 4),
            ]
        );
        let cells: usize = parts.iter().map(|b| b.row_count() * b.col_count()).sum();
        assert_eq!(cells, 24);
    }

    #[test]
    fn test_difference_disjoint_and_covering() {
        let block = Block::new(0, 0, 2, 2);
        assert_eq!(block.difference(&Block::new(5, 5, 6, 6)), vec![block]);
        assert!(block.difference(&Block::new(0, 0, 9, 9)).is_empty());
    }

    #[test]
    fn test_difference_of_full_row_keeps_rows_whole() {
        let rows = Block::new(0, 0, 5, 9);
        let parts = rows.difference(&Block::row(2, 10));
        assert_eq!(parts, vec![Block::new(0, 0, 1, 9), Block::new(3, 0, 5, 9)]);
        assert!(parts.iter().all(|b| b.is_full_row(10)));
    }

    #[test]
    fn test_full_row_and_col() {
        assert!(Block::row(3, 8).is_full_row(8));
        assert!(!Block::row(3, 8).is_full_row(9));
        assert!(Block::col(2, 5).is_full_col(5));
        assert!(Block::cell(CellCoords::new(1, 1)).is_single_cell());
    }
}
