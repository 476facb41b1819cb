/// Grid selection module - block selection and selection outlines
mod events;
mod mode;

pub use events::{KeyboardState, Notify, RangeEventKind, SelectionEvent, SelectionListener};
pub use mode::SelectionMode;

use log::debug;

use crate::block::{Block, CellCoords, GridSize};
use crate::config::SelectionConfig;
use crate::geometry::GridGeometry;
use crate::merge;
use crate::polygon::{compute_poly_polygon, PolyPolygon};

/// Outline computed for one geometry (scroll position, cell sizes)
struct PolyCache {
    geometry: GridGeometry,
    poly: PolyPolygon,
}

/// How a selected block is reported by the queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Cell,
    Rows,
    Cols,
    Area,
}

/// Selection manager owning the selected blocks of one grid.
///
/// Blocks are kept unsorted. If there are any, the last one is the current
/// block: the one affected by extending the selection from the keyboard or
/// by dragging.
pub struct SelectionManager {
    selection: Vec<Block>,
    mode: SelectionMode,
    size: GridSize,
    listener: Option<Box<dyn SelectionListener>>,
    poly_cache: Option<PolyCache>,
}

impl SelectionManager {
    pub fn new(size: GridSize, mode: SelectionMode) -> Self {
        Self {
            selection: Vec::new(),
            mode,
            size,
            listener: None,
            poly_cache: None,
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        Self::new(config.grid_size(), config.mode)
    }

    /// Set the receiver of selection events and refresh requests
    pub fn set_listener(&mut self, listener: Box<dyn SelectionListener>) {
        self.listener = Some(listener);
    }

    pub fn with_listener(mut self, listener: impl SelectionListener + 'static) -> Self {
        self.set_listener(Box::new(listener));
        self
    }

    /// Check if anything is selected
    pub fn is_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Check if the cell is part of any selected block
    pub fn is_in_selection(&self, row: usize, col: usize) -> bool {
        self.selection.iter().any(|block| block.contains_cell(row, col))
    }

    /// All selected blocks, the current one last
    pub fn blocks(&self) -> &[Block] {
        &self.selection
    }

    pub fn current_block(&self) -> Option<Block> {
        self.selection.last().copied()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn grid_size(&self) -> GridSize {
        self.size
    }

    /// Change the selection mode.
    ///
    /// Blocks that are legal in the new mode are kept. If any block isn't,
    /// the whole selection is cleared.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        if mode == self.mode {
            return;
        }

        let size = self.size;
        let legal = self.selection.iter().all(|block| mode.allows(block, size))
            && !(mode == SelectionMode::SingleBlock && self.selection.len() > 1);

        debug!("selection mode {} -> {} (keep blocks: {})", self.mode, mode, legal);
        self.mode = mode;
        if !legal {
            self.clear_selection();
        }
    }

    /// The grid was resized.
    ///
    /// Blocks are clipped to the new extent. Blocks spanning every row or
    /// column of the old extent are stretched to span the new one.
    pub fn set_grid_size(&mut self, size: GridSize) {
        if size == self.size {
            return;
        }
        let old = std::mem::replace(&mut self.size, size);

        let bounds = size.full_block();
        let resized: Vec<Block> = self
            .selection
            .iter()
            .filter_map(|block| {
                let mut block = *block;
                if block.is_full_row(old.cols) {
                    block = block.with_cols(0, size.cols.checked_sub(1)?);
                }
                if block.is_full_col(old.rows) {
                    block = block.with_rows(0, size.rows.checked_sub(1)?);
                }
                block.intersection(&bounds?)
            })
            .collect();
        self.selection = resized;
        merge::merge_adjacent(&mut self.selection);
        self.invalidate_poly_polygon();
    }

    /// Select a whole row
    pub fn select_row(&mut self, row: usize, kbd: KeyboardState) {
        if !self.mode.allows_rows() || self.size.is_empty() {
            return;
        }
        debug_assert!(row < self.size.rows, "row {} out of range", row);
        self.select(Block::row(row, self.size.cols), kbd, Notify::Selected);
    }

    /// Select a whole column
    pub fn select_col(&mut self, col: usize, kbd: KeyboardState) {
        if !self.mode.allows_cols() || self.size.is_empty() {
            return;
        }
        debug_assert!(col < self.size.cols, "column {} out of range", col);
        self.select(Block::col(col, self.size.rows), kbd, Notify::Selected);
    }

    /// Select a block, adjusted to what the selection mode allows
    pub fn select_block(&mut self, block: Block, kbd: KeyboardState, notify: Notify) {
        debug_assert!(
            self.size.contains(block.bottom_right()),
            "block {} outside grid {:?}",
            block,
            self.size
        );

        match self.mode.coerce(block, self.size) {
            Some(block) => self.select(block, kbd, notify),
            None => debug!("block {} not selectable in {} mode", block, self.mode),
        }
    }

    /// Replace the selection with a single block covering the whole grid
    pub fn select_all(&mut self) {
        if self.mode == SelectionMode::Disabled {
            return;
        }
        let Some(all) = self.size.full_block() else {
            return;
        };

        // Every existing block becomes redundant
        self.selection.clear();
        self.select(all, KeyboardState::default(), Notify::Selected);
    }

    /// Remove a block that was selected exactly as given
    pub fn deselect_block(&mut self, block: Block, kbd: KeyboardState, notify: Notify) {
        let Some(pos) = self.selection.iter().position(|b| *b == block) else {
            return;
        };

        self.selection.remove(pos);
        merge::merge_adjacent(&mut self.selection);
        debug!("deselected {}, {} blocks left", block, self.selection.len());

        self.refresh(block);
        self.invalidate_poly_polygon();
        self.send(notify, Some(block), false, kbd);
    }

    /// Remove the cells of `region` from every block that overlaps it.
    ///
    /// Blocks are split into the parts left around the region. Whole-row and
    /// whole-column blocks lose whole rows/columns so they keep their shape.
    /// In single block mode an overlapping block is dropped entirely.
    pub fn deselect_region(&mut self, region: Block, kbd: KeyboardState, notify: Notify) {
        let size = self.size;
        let mode = self.mode;
        let mut changed = false;
        let mut remaining = Vec::with_capacity(self.selection.len());

        for block in std::mem::take(&mut self.selection) {
            if !block.intersects(&region) {
                remaining.push(block);
                continue;
            }
            changed = true;
            self.refresh(block);

            let full_rows = region.with_cols(0, size.cols.saturating_sub(1));
            let full_cols = region.with_rows(0, size.rows.saturating_sub(1));
            let hole = match mode {
                SelectionMode::Rows => full_rows,
                SelectionMode::Columns => full_cols,
                SelectionMode::RowsOrColumns if block.is_full_row(size.cols) => full_rows,
                SelectionMode::RowsOrColumns => full_cols,
                SelectionMode::SingleBlock => continue,
                SelectionMode::Cells | SelectionMode::Disabled => region,
            };
            remaining.extend(block.difference(&hole));
        }
        self.selection = remaining;

        if !changed {
            return;
        }
        merge::merge_adjacent(&mut self.selection);
        debug!("deselected region {}, {} blocks left", region, self.selection.len());

        self.invalidate_poly_polygon();
        self.send(notify, Some(region), false, kbd);
    }

    /// Deselect everything.
    ///
    /// Previously selected blocks are refreshed and a deselection event for
    /// all cells is always sent.
    pub fn clear_selection(&mut self) {
        for block in std::mem::take(&mut self.selection) {
            self.refresh(block);
        }
        debug!("selection cleared");

        self.invalidate_poly_polygon();
        self.send(Notify::Selected, None, false, KeyboardState::default());
    }

    /// Extend (or shrink) the current block to the one spanning `start` and `end`.
    ///
    /// The corners don't have to be in top-left/bottom-right order. If there
    /// is no selection, or the current block doesn't contain `start`, a new
    /// block is added instead.
    ///
    /// Returns true if the selection actually changed.
    pub fn extend_current_block(
        &mut self,
        start: CellCoords,
        end: CellCoords,
        kbd: KeyboardState,
        notify: Notify,
    ) -> bool {
        debug_assert!(self.size.contains(start) && self.size.contains(end));

        let last_row = self.size.rows.saturating_sub(1);
        let last_col = self.size.cols.saturating_sub(1);
        let (mut start_corner, mut end_corner) = (start, end);

        let current = self
            .selection
            .last()
            .copied()
            .filter(|block| block.contains_cell(start.row, start.col));

        let extend_rows = match self.mode {
            SelectionMode::Cells | SelectionMode::SingleBlock => None,
            SelectionMode::Rows => Some(true),
            SelectionMode::Columns => Some(false),
            SelectionMode::RowsOrColumns => Some(!current.is_some_and(|block| {
                block.is_full_col(self.size.rows) && !block.is_full_row(self.size.cols)
            })),
            SelectionMode::Disabled => return false,
        };
        match extend_rows {
            Some(true) => {
                start_corner.col = 0;
                end_corner.col = last_col;
            }
            Some(false) => {
                start_corner.row = 0;
                end_corner.row = last_row;
            }
            None => {}
        }

        let new_block = Block::from_corners(start_corner, end_corner);
        if current == Some(new_block) {
            return false;
        }

        if current.is_some() {
            self.selection.pop();
        }
        if self.mode == SelectionMode::SingleBlock {
            for block in std::mem::take(&mut self.selection) {
                self.refresh(block);
            }
        }
        let added = merge::merge_or_add(&mut self.selection, new_block);
        if current.is_none() && !added {
            return false;
        }

        match current {
            Some(old) => {
                // Only the cells that changed state need redrawing
                for part in old.difference(&new_block) {
                    self.refresh(part);
                }
                for part in new_block.difference(&old) {
                    self.refresh(part);
                }
            }
            None => self.refresh(new_block),
        }
        debug!("current block extended to {}", new_block);

        self.invalidate_poly_polygon();
        self.send(notify, Some(new_block), true, kbd);
        true
    }

    /// Cell from which the selection continues to be extended.
    ///
    /// That is the corner of the current block opposite to `current_cell`, or
    /// `current_cell` itself when nothing is selected.
    pub fn extension_anchor(&self, current_cell: CellCoords) -> CellCoords {
        let mut coords = current_cell;
        let Some(block) = self.selection.last() else {
            return coords;
        };

        if block.top() == coords.row {
            coords.row = block.bottom();
        } else if block.bottom() == coords.row {
            coords.row = block.top();
        }

        if block.left() == coords.col {
            coords.col = block.right();
        } else if block.right() == coords.col {
            coords.col = block.left();
        }

        coords
    }

    /// Rows were inserted (`delta > 0`) or deleted (`delta < 0`) at `pos`
    pub fn update_rows(&mut self, pos: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let old_rows = self.size.rows;
        self.size.rows = old_rows.saturating_add_signed(delta);
        let rows = self.size.rows;

        self.update_blocks(|block| {
            let (top, bottom) = shift_range(block.top(), block.bottom(), pos, delta)?;
            if block.is_full_col(old_rows) {
                // Rows appended after the end still belong to full columns
                return Some(block.with_rows(0, rows.checked_sub(1)?));
            }
            Some(block.with_rows(top, bottom))
        });
    }

    /// Columns were inserted (`delta > 0`) or deleted (`delta < 0`) at `pos`
    pub fn update_cols(&mut self, pos: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let old_cols = self.size.cols;
        self.size.cols = old_cols.saturating_add_signed(delta);
        let cols = self.size.cols;

        self.update_blocks(|block| {
            let (left, right) = shift_range(block.left(), block.right(), pos, delta)?;
            if block.is_full_row(old_cols) {
                return Some(block.with_cols(0, cols.checked_sub(1)?));
            }
            Some(block.with_cols(left, right))
        });
    }

    /// Send the final event after a drag that only sent `Selecting` events
    pub fn end_selecting(&mut self) {
        let Some(block) = self.current_block() else {
            return;
        };
        self.send(Notify::Selected, Some(block), true, KeyboardState::default());
    }

    /// Abort a drag, dropping the block it was extending
    pub fn cancel_selecting(&mut self) {
        let Some(block) = self.selection.pop() else {
            return;
        };
        debug!("selecting cancelled, dropped {}", block);
        self.refresh(block);
        self.invalidate_poly_polygon();
    }

    /// Individually selected cells
    pub fn selected_cells(&self) -> Vec<CellCoords> {
        self.blocks_of(BlockKind::Cell)
            .map(|block| block.top_left())
            .collect()
    }

    /// Indices of fully selected rows, sorted
    pub fn selected_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .blocks_of(BlockKind::Rows)
            .flat_map(|block| block.top()..=block.bottom())
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Indices of fully selected columns, sorted
    pub fn selected_cols(&self) -> Vec<usize> {
        let mut cols: Vec<usize> = self
            .blocks_of(BlockKind::Cols)
            .flat_map(|block| block.left()..=block.right())
            .collect();
        cols.sort_unstable();
        cols.dedup();
        cols
    }

    /// Selected blocks that are neither single cells nor whole rows/columns
    pub fn block_selection(&self) -> Vec<Block> {
        self.blocks_of(BlockKind::Area).copied().collect()
    }

    /// Outline of the visible selection, recomputed when stale
    pub fn poly_polygon(&mut self, geometry: &GridGeometry) -> &PolyPolygon {
        if self
            .poly_cache
            .as_ref()
            .is_some_and(|cache| cache.geometry != *geometry)
        {
            self.poly_cache = None;
        }

        let selection = &self.selection;
        let size = self.size;
        &self
            .poly_cache
            .get_or_insert_with(|| {
                let poly = compute_poly_polygon(geometry.visible_rects(selection, size));
                debug!("computed selection outline: {} polygons", poly.len());
                PolyCache {
                    geometry: *geometry,
                    poly,
                }
            })
            .poly
    }

    pub fn invalidate_poly_polygon(&mut self) {
        self.poly_cache = None;
    }

    /// Select without checking the selection mode
    fn select(&mut self, block: Block, kbd: KeyboardState, notify: Notify) {
        if self.mode == SelectionMode::SingleBlock {
            for old in std::mem::take(&mut self.selection) {
                self.refresh(old);
            }
        }

        if merge::merge_or_add(&mut self.selection, block) {
            merge::merge_adjacent(&mut self.selection);
        }
        debug!("selected {}, {} blocks", block, self.selection.len());

        self.refresh(block);
        self.invalidate_poly_polygon();
        self.send(notify, Some(block), true, kbd);
    }

    fn update_blocks(&mut self, mut update: impl FnMut(&Block) -> Option<Block>) {
        let updated: Vec<Block> = self.selection.iter().filter_map(|block| update(block)).collect();
        self.selection = updated;
        merge::merge_adjacent(&mut self.selection);
        self.invalidate_poly_polygon();
    }

    fn classify(&self, block: &Block) -> BlockKind {
        match self.mode {
            SelectionMode::Rows => BlockKind::Rows,
            SelectionMode::Columns => BlockKind::Cols,
            SelectionMode::RowsOrColumns if block.is_full_row(self.size.cols) => BlockKind::Rows,
            SelectionMode::RowsOrColumns => BlockKind::Cols,
            _ if block.is_single_cell() => BlockKind::Cell,
            _ if block.is_full_row(self.size.cols) => BlockKind::Rows,
            _ if block.is_full_col(self.size.rows) => BlockKind::Cols,
            _ => BlockKind::Area,
        }
    }

    fn blocks_of(&self, kind: BlockKind) -> impl Iterator<Item = &Block> + '_ {
        self.selection
            .iter()
            .filter(move |block| self.classify(block) == kind)
    }

    fn refresh(&mut self, block: Block) {
        if let Some(listener) = self.listener.as_mut() {
            listener.refresh_block(block);
        }
    }

    fn send(&mut self, notify: Notify, block: Option<Block>, selected: bool, modifiers: KeyboardState) {
        let Some(kind) = notify.kind() else {
            return;
        };
        let event = SelectionEvent {
            kind,
            block,
            selected,
            modifiers,
        };
        if let Some(listener) = self.listener.as_mut() {
            listener.on_selection_event(&event);
        }
    }
}

/// New bounds of the inclusive range `first..=last` after inserting
/// (`delta > 0`) or deleting (`delta < 0`) `|delta|` entries at `pos`.
///
/// Returns `None` if every entry of the range was deleted.
fn shift_range(first: usize, last: usize, pos: usize, delta: isize) -> Option<(usize, usize)> {
    if delta > 0 {
        let n = delta.unsigned_abs();
        let first = if first >= pos { first.saturating_add(n) } else { first };
        let last = if last >= pos { last.saturating_add(n) } else { last };
        return Some((first, last));
    }

    let n = delta.unsigned_abs();
    let deleted_end = pos + n;
    let first = match first {
        f if f < pos => f,
        f if f >= deleted_end => f - n,
        _ => pos,
    };
    let last = match last {
        l if l < pos => l,
        l if l >= deleted_end => l - n,
        // Last surviving entry before the deleted range, if any
        _ => pos.checked_sub(1)?,
    };
    (first <= last).then_some((first, last))
}
