use serde::{Deserialize, Serialize};

use super::CellStyle;

/// Cell with position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    pub r: u32, // row (0-indexed)
    pub c: u32, // col (0-indexed)
    pub cell: Cell,
}

/// A single cell's value and style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Text value; `None` writes a styled empty cell (the signature box)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
    pub style: CellStyle,
}

impl Cell {
    pub fn text(value: &str, style: CellStyle) -> Self {
        Self {
            v: Some(value.to_string()),
            style,
        }
    }

    pub fn empty(style: CellStyle) -> Self {
        Self { v: None, style }
    }
}
