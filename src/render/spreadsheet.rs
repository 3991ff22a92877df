//! Builds the `Firmas` worksheet model from a [`BlockLayout`].
//!
//! Row 1 carries the column headers. Blocks start on row 2 and are laid
//! out on a grid of `block_size + v_spacing` rows by `3 + h_spacing`
//! columns per slot.

use serde::{Deserialize, Serialize};

use crate::layout::{BlockLayout, CellEdges, EdgeWeight};
use crate::types::{BorderStyle, Cell, CellStyle, HAlign, Sheet, VAlign, SIGN_SHEET_NAME};

/// Header text of each column in a block.
pub const BLOCK_HEADERS: [&str; 3] = ["Nombre", "Apellidos", "Firma"];

/// Columns occupied by one block.
pub const BLOCK_COLUMNS: u32 = 3;

/// Spacing, widths and heights of the generated worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetGeometry {
    /// Empty rows between vertically adjacent blocks.
    pub v_spacing: u32,
    /// Empty columns between horizontally adjacent blocks.
    pub h_spacing: u32,
    pub first_name_width: f64,
    pub last_name_width: f64,
    pub signature_width: f64,
    pub spacer_width: f64,
    pub header_row_height: f64,
    pub row_height: f64,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self {
            v_spacing: 2,
            h_spacing: 2,
            first_name_width: 15.0,
            last_name_width: 30.0,
            signature_width: 12.0,
            spacer_width: 5.0,
            header_row_height: 20.0,
            row_height: 25.0,
        }
    }
}

impl SheetGeometry {
    /// Width of one grid slot in columns (block plus trailing spacer).
    fn slot_columns(&self) -> u32 {
        BLOCK_COLUMNS + self.h_spacing
    }

    fn column_widths(&self) -> [f64; 3] {
        [
            self.first_name_width,
            self.last_name_width,
            self.signature_width,
        ]
    }
}

/// Build the sign sheet for `layout`.
///
/// An empty layout still yields the header row.
pub fn build_sheet(layout: &BlockLayout<'_>, geometry: &SheetGeometry) -> Sheet {
    let mut sheet = Sheet::new(SIGN_SHEET_NAME);
    let groups = to_u32(layout.column_groups());

    let header_style = CellStyle::default()
        .bold()
        .with_border_all(BorderStyle::Thin)
        .with_alignment(HAlign::Center, VAlign::Center);

    for group in 0..groups {
        let base_col = group * geometry.slot_columns();
        for ((offset, header), width) in (0u32..)
            .zip(BLOCK_HEADERS)
            .zip(geometry.column_widths())
        {
            sheet.set_cell(0, base_col + offset, Cell::text(header, header_style.clone()));
            sheet.set_col_width(base_col + offset, width);
        }
        if group + 1 < groups {
            for spacer in 0..geometry.h_spacing {
                sheet.set_col_width(base_col + BLOCK_COLUMNS + spacer, geometry.spacer_width);
            }
        }
    }
    sheet.set_row_height(0, geometry.header_row_height);

    let block_rows = to_u32(layout.block_size()) + geometry.v_spacing;
    for block in layout.blocks() {
        let start_row = 1 + to_u32(block.grid_row) * block_rows;
        let start_col = to_u32(block.grid_col) * geometry.slot_columns();

        for block_row in block.rows() {
            let r = start_row + to_u32(block_row.row);
            let values = [
                Some(block_row.participant.first_name.as_str()),
                Some(block_row.participant.last_name.as_str()),
                None,
            ];
            for (offset, value) in (0u32..).zip(values) {
                let edges = block_row.edges(offset as usize, BLOCK_COLUMNS as usize);
                let style = edge_style(edges).with_alignment(HAlign::Left, VAlign::Center);
                let cell = match value {
                    Some(text) => Cell::text(text, style),
                    None => Cell::empty(style),
                };
                sheet.set_cell(r, start_col + offset, cell);
            }
            sheet.set_row_height(r, geometry.row_height);
        }
    }

    sheet
}

fn edge_style(edges: CellEdges) -> CellStyle {
    CellStyle::default().with_borders(
        border_for(edges.top),
        border_for(edges.right),
        border_for(edges.bottom),
        border_for(edges.left),
    )
}

fn border_for(weight: EdgeWeight) -> BorderStyle {
    match weight {
        EdgeWeight::Thin => BorderStyle::Thin,
        EdgeWeight::Thick => BorderStyle::Thick,
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::layout::{LayoutConfig, LayoutMode};
    use crate::types::ParticipantRecord;

    fn roster(n: usize) -> Vec<ParticipantRecord> {
        (0..n)
            .map(|i| ParticipantRecord::new(&format!("N{i:02}"), &format!("S{i:02}")))
            .collect()
    }

    fn sheet_for(people: &[ParticipantRecord], config: &LayoutConfig) -> Sheet {
        let layout = BlockLayout::new(people, config).unwrap();
        build_sheet(&layout, &SheetGeometry::default())
    }

    #[test]
    fn test_header_row() {
        let sheet = sheet_for(&roster(3), &LayoutConfig::default());
        assert_eq!(sheet.name, "Firmas");
        for (c, text) in BLOCK_HEADERS.iter().enumerate() {
            let cell = sheet.cell_at(0, c as u32).unwrap();
            assert_eq!(cell.v.as_deref(), Some(*text));
            assert!(cell.style.bold);
            assert_eq!(cell.style.align_h, Some(HAlign::Center));
            assert_eq!(cell.style.border_top, BorderStyle::Thin);
        }
        assert_eq!(sheet.row_height(0), Some(20.0));
    }

    #[test]
    fn test_second_group_header_only_when_used() {
        let one_block = sheet_for(&roster(8), &LayoutConfig::default());
        assert!(one_block.cell_at(0, 5).is_none());

        let two_blocks = sheet_for(&roster(9), &LayoutConfig::default());
        assert_eq!(two_blocks.cell_at(0, 5).unwrap().v.as_deref(), Some("Nombre"));
        assert_eq!(two_blocks.cell_at(0, 7).unwrap().v.as_deref(), Some("Firma"));
    }

    #[test]
    fn test_block_positions() {
        let people = roster(40);
        let sheet = sheet_for(&people, &LayoutConfig::default());
        // Block 0 at A2, block 1 at F2, block 2 at A12 (1-based).
        assert_eq!(sheet.cell_at(1, 0).unwrap().v.as_deref(), Some("N00"));
        assert_eq!(sheet.cell_at(1, 5).unwrap().v.as_deref(), Some("N08"));
        assert_eq!(sheet.cell_at(11, 0).unwrap().v.as_deref(), Some("N16"));
        assert_eq!(sheet.cell_at(11, 6).unwrap().v.as_deref(), Some("S24"));
        assert_eq!(sheet.cell_at(21, 0).unwrap().v.as_deref(), Some("N32"));
    }

    #[test]
    fn test_stacked_blocks_share_first_columns() {
        let config = LayoutConfig {
            mode: LayoutMode::Stacked,
            ..LayoutConfig::default()
        };
        let sheet = sheet_for(&roster(12), &config);
        assert_eq!(sheet.cell_at(11, 0).unwrap().v.as_deref(), Some("N08"));
        assert_eq!(sheet.max_col, 3);
    }

    #[test]
    fn test_block_borders() {
        let sheet = sheet_for(&roster(5), &LayoutConfig::default());
        let top_left = &sheet.cell_at(1, 0).unwrap().style;
        assert_eq!(top_left.border_top, BorderStyle::Thick);
        assert_eq!(top_left.border_left, BorderStyle::Thick);
        assert_eq!(top_left.border_right, BorderStyle::Thin);
        assert_eq!(top_left.border_bottom, BorderStyle::Thin);

        let last_sig = &sheet.cell_at(5, 2).unwrap().style;
        assert_eq!(last_sig.border_bottom, BorderStyle::Thick);
        assert_eq!(last_sig.border_right, BorderStyle::Thick);
        assert_eq!(last_sig.align_h, Some(HAlign::Left));
        assert!(sheet.cell_at(5, 2).unwrap().v.is_none());
    }

    #[test]
    fn test_widths_and_heights() {
        let sheet = sheet_for(&roster(9), &LayoutConfig::default());
        let width = |c: u32| sheet.col_widths.iter().find(|cw| cw.col == c).unwrap().width;
        assert_eq!(width(0), 15.0);
        assert_eq!(width(1), 30.0);
        assert_eq!(width(2), 12.0);
        assert_eq!(width(3), 5.0);
        assert_eq!(width(4), 5.0);
        assert_eq!(width(7), 12.0);
        assert_eq!(sheet.row_height(1), Some(25.0));
    }

    #[test]
    fn test_empty_layout_is_header_only() {
        let sheet = sheet_for(&[], &LayoutConfig::default());
        assert_eq!(sheet.cells.len(), 3);
        assert_eq!(sheet.max_row, 1);
    }
}
