use serde::{Deserialize, Serialize};

use super::*;

/// Name of the single worksheet in the generated workbook.
pub const SIGN_SHEET_NAME: &str = "Firmas";

/// A worksheet ready for XLSX export.
///
/// Cells may be pushed in any order; [`Sheet::sorted_cells`] yields them
/// in row-major order as SpreadsheetML requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    pub cells: Vec<CellData>,
    pub col_widths: Vec<ColWidth>,
    pub row_heights: Vec<RowHeight>,
    pub default_col_width: f64,
    pub default_row_height: f64,
    /// Number of used rows (one past the last 0-indexed row).
    pub max_row: u32,
    /// Number of used columns (one past the last 0-indexed column).
    pub max_col: u32,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
            col_widths: Vec::new(),
            row_heights: Vec::new(),
            default_col_width: 8.43,
            default_row_height: 15.0,
            max_row: 0,
            max_col: 0,
        }
    }

    /// Place a cell, replacing any existing cell at the same position.
    pub fn set_cell(&mut self, r: u32, c: u32, cell: Cell) {
        if let Some(existing) = self.cells.iter_mut().find(|cd| cd.r == r && cd.c == c) {
            existing.cell = cell;
        } else {
            self.cells.push(CellData { r, c, cell });
        }
        self.max_row = self.max_row.max(r + 1);
        self.max_col = self.max_col.max(c + 1);
    }

    pub fn cell_at(&self, r: u32, c: u32) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|cd| cd.r == r && cd.c == c)
            .map(|cd| &cd.cell)
    }

    pub fn set_col_width(&mut self, col: u32, width: f64) {
        if let Some(existing) = self.col_widths.iter_mut().find(|cw| cw.col == col) {
            existing.width = width;
        } else {
            self.col_widths.push(ColWidth { col, width });
        }
    }

    pub fn set_row_height(&mut self, row: u32, height: f64) {
        if let Some(existing) = self.row_heights.iter_mut().find(|rh| rh.row == row) {
            existing.height = height;
        } else {
            self.row_heights.push(RowHeight { row, height });
        }
    }

    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights
            .iter()
            .find(|rh| rh.row == row)
            .map(|rh| rh.height)
    }

    /// Cells in row-major order.
    pub fn sorted_cells(&self) -> Vec<&CellData> {
        let mut cells: Vec<&CellData> = self.cells.iter().collect();
        cells.sort_by_key(|cd| (cd.r, cd.c));
        cells
    }
}
