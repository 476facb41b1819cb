/// Selection modes and the block shapes they allow
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::block::{Block, GridSize};
use crate::error::Error;

/// Selection mode determining which block shapes can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Any rectangular block of cells
    #[default]
    Cells,
    /// Whole rows only
    Rows,
    /// Whole columns only
    Columns,
    /// Whole rows or whole columns
    RowsOrColumns,
    /// Any block, but only one at a time
    SingleBlock,
    /// Nothing can be selected
    Disabled,
}

impl SelectionMode {
    /// Check if `block` is a legal selection shape in this mode
    pub fn allows(&self, block: &Block, size: GridSize) -> bool {
        match self {
            SelectionMode::Cells | SelectionMode::SingleBlock => true,
            SelectionMode::Rows => block.is_full_row(size.cols),
            SelectionMode::Columns => block.is_full_col(size.rows),
            SelectionMode::RowsOrColumns => {
                block.is_full_row(size.cols) || block.is_full_col(size.rows)
            }
            SelectionMode::Disabled => false,
        }
    }

    /// Turn a requested block into the block this mode actually selects.
    ///
    /// `Rows` and `Columns` widen the block to whole rows/columns. Returns
    /// `None` if the mode can't select anything like it.
    pub fn coerce(&self, block: Block, size: GridSize) -> Option<Block> {
        match self {
            SelectionMode::Cells | SelectionMode::SingleBlock => Some(block),
            SelectionMode::Rows => Some(block.with_cols(0, size.cols.saturating_sub(1))),
            SelectionMode::Columns => Some(block.with_rows(0, size.rows.saturating_sub(1))),
            SelectionMode::RowsOrColumns => self.allows(&block, size).then_some(block),
            SelectionMode::Disabled => None,
        }
    }

    /// Whole rows can be selected in this mode
    pub fn allows_rows(&self) -> bool {
        !matches!(self, SelectionMode::Columns | SelectionMode::Disabled)
    }

    /// Whole columns can be selected in this mode
    pub fn allows_cols(&self) -> bool {
        !matches!(self, SelectionMode::Rows | SelectionMode::Disabled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Cells => "cells",
            SelectionMode::Rows => "rows",
            SelectionMode::Columns => "columns",
            SelectionMode::RowsOrColumns => "rows_or_columns",
            SelectionMode::SingleBlock => "single_block",
            SelectionMode::Disabled => "disabled",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cells" => Ok(SelectionMode::Cells),
            "rows" => Ok(SelectionMode::Rows),
            "columns" | "cols" => Ok(SelectionMode::Columns),
            "rows_or_columns" => Ok(SelectionMode::RowsOrColumns),
            "single_block" | "single" => Ok(SelectionMode::SingleBlock),
            "disabled" | "none" => Ok(SelectionMode::Disabled),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}
