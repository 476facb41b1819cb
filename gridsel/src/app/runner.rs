use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use gridsel_core::{
    Block, Config, GridGeometry, KeyboardState, SelectionEvent, SelectionListener,
    SelectionManager,
};
use log::{debug, info, warn};

use super::commands::Command;

/// Largest row or column count a script can grow the grid to
const MAX_LINES: usize = isize::MAX as usize;

/// Listener standing in for the grid window: logs events and repaints
#[derive(Clone, Default)]
struct GridListener {
    events: Rc<RefCell<Vec<SelectionEvent>>>,
}

impl SelectionListener for GridListener {
    fn on_selection_event(&mut self, event: &SelectionEvent) {
        match event.block {
            Some(block) => info!(
                "{:?}: {} {}",
                event.kind,
                if event.selected { "selected" } else { "deselected" },
                block
            ),
            None => info!("{:?}: selection cleared", event.kind),
        }
        if event.modifiers.has_modifiers() {
            debug!("with modifiers {:?}", event.modifiers);
        }
        self.events.borrow_mut().push(*event);
    }

    fn refresh_block(&mut self, block: Block) {
        debug!("repaint {}", block);
    }
}

/// Runs selection commands against one grid
pub struct Runner {
    selection: SelectionManager,
    geometry: GridGeometry,
    events: Rc<RefCell<Vec<SelectionEvent>>>,
}

impl Runner {
    pub fn new(config: &Config) -> Self {
        let listener = GridListener::default();
        let events = listener.events.clone();
        Self {
            selection: SelectionManager::from_config(&config.selection).with_listener(listener),
            geometry: GridGeometry::from_config(&config.geometry),
            events,
        }
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Events raised so far
    pub fn events(&self) -> Vec<SelectionEvent> {
        self.events.borrow().clone()
    }

    pub fn run(&mut self, commands: &[Command], out: &mut impl Write) -> io::Result<()> {
        for command in commands {
            self.execute(command, out)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: &Command, out: &mut impl Write) -> io::Result<()> {
        debug!("executing {:?}", command);
        let size = self.selection.grid_size();
        let notify = command.notify();

        match *command {
            Command::Size { rows, cols } => {
                self.selection.set_grid_size(gridsel_core::GridSize::new(rows, cols))
            }
            Command::Mode(mode) => self.selection.set_selection_mode(mode),
            Command::Row { row, kbd } => {
                if row >= size.rows {
                    warn!("row {} out of range", row);
                    return Ok(());
                }
                self.selection.select_row(row, kbd);
            }
            Command::Col { col, kbd } => {
                if col >= size.cols {
                    warn!("column {} out of range", col);
                    return Ok(());
                }
                self.selection.select_col(col, kbd);
            }
            Command::Block { block, kbd } => {
                if self.in_grid(&block) {
                    self.selection.select_block(block, kbd, notify);
                }
            }
            Command::All => self.selection.select_all(),
            Command::Deselect { block, kbd } => self.selection.deselect_block(block, kbd, notify),
            Command::Carve { block, kbd } => self.selection.deselect_region(block, kbd, notify),
            Command::Clear => self.selection.clear_selection(),
            Command::Extend {
                start,
                end,
                kbd,
                ..
            } => {
                if !size.contains(start) || !size.contains(end) {
                    warn!("extend {} -> {} out of range", start, end);
                    return Ok(());
                }
                if !self.selection.extend_current_block(start, end, kbd, notify) {
                    debug!("selection unchanged");
                }
            }
            Command::Click { x, y, kbd } => self.click(x, y, kbd),
            Command::Anchor(cell) => {
                let anchor = self.selection.extension_anchor(cell);
                writeln!(out, "anchor {}", anchor)?;
            }
            Command::InsertRows { pos, count } => {
                let count = count.min(MAX_LINES.saturating_sub(size.rows));
                self.selection.update_rows(pos, signed(count));
            }
            Command::DeleteRows { pos, count } => {
                let count = count.min(size.rows.saturating_sub(pos));
                self.selection.update_rows(pos, -signed(count));
            }
            Command::InsertCols { pos, count } => {
                let count = count.min(MAX_LINES.saturating_sub(size.cols));
                self.selection.update_cols(pos, signed(count));
            }
            Command::DeleteCols { pos, count } => {
                let count = count.min(size.cols.saturating_sub(pos));
                self.selection.update_cols(pos, -signed(count));
            }
            Command::Scroll { x, y } => self.geometry.scroll_to(x, y),
            Command::End => self.selection.end_selecting(),
            Command::Cancel => self.selection.cancel_selecting(),
            Command::Show => self.show(out)?,
        }
        Ok(())
    }

    /// Plain click selects the cell alone, with ctrl it is added
    fn click(&mut self, x: i32, y: i32, kbd: KeyboardState) {
        let size = self.selection.grid_size();
        let Some(cell) = self.geometry.pixels_to_cell(x, y, size) else {
            debug!("click at ({}, {}) is outside the cells", x, y);
            return;
        };
        if !kbd.ctrl {
            self.selection.clear_selection();
        }
        self.selection
            .select_block(Block::cell(cell), kbd, gridsel_core::Notify::Selected);
    }

    fn in_grid(&self, block: &Block) -> bool {
        let inside = self.selection.grid_size().contains(block.bottom_right());
        if !inside {
            warn!("block {} out of range", block);
        }
        inside
    }

    fn show(&mut self, out: &mut impl Write) -> io::Result<()> {
        let size = self.selection.grid_size();
        writeln!(
            out,
            "grid {}x{}, mode {}",
            size.rows,
            size.cols,
            self.selection.selection_mode()
        )?;

        let blocks: Vec<String> = self.selection.blocks().iter().map(|b| b.to_string()).collect();
        writeln!(out, "blocks: [{}]", blocks.join(", "))?;
        writeln!(out, "rows: {:?}", self.selection.selected_rows())?;
        writeln!(out, "cols: {:?}", self.selection.selected_cols())?;

        let geometry = self.geometry;
        let poly = self.selection.poly_polygon(&geometry);
        if let Some(rect) = poly.as_rect() {
            writeln!(out, "outline: rect {},{} {}x{}", rect.x, rect.y, rect.width, rect.height)?;
            return Ok(());
        }
        writeln!(out, "outline: {} polygons", poly.len())?;
        for polygon in poly.polygons() {
            let points: Vec<String> = polygon.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
            writeln!(out, "  {}", points.join(" "))?;
        }
        Ok(())
    }
}

fn signed(count: usize) -> isize {
    isize::try_from(count).unwrap_or(isize::MAX)
}
