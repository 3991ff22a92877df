use serde::{Deserialize, Serialize};

/// Cell style for the generated worksheet.
///
/// Only what the sign sheet needs: bold font, alignment and one border
/// style per side. Equal styles share one `cellXfs` entry on export.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub bold: bool,

    // Borders
    pub border_top: BorderStyle,
    pub border_right: BorderStyle,
    pub border_bottom: BorderStyle,
    pub border_left: BorderStyle,

    // Alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_h: Option<HAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_v: Option<VAlign>,
}

impl CellStyle {
    /// Same border style on all four sides.
    #[must_use]
    pub fn with_border_all(mut self, style: BorderStyle) -> Self {
        self.border_top = style;
        self.border_right = style;
        self.border_bottom = style;
        self.border_left = style;
        self
    }

    #[must_use]
    pub fn with_borders(
        mut self,
        top: BorderStyle,
        right: BorderStyle,
        bottom: BorderStyle,
        left: BorderStyle,
    ) -> Self {
        self.border_top = top;
        self.border_right = right;
        self.border_bottom = bottom;
        self.border_left = left;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, h: HAlign, v: VAlign) -> Self {
        self.align_h = Some(h);
        self.align_v = Some(v);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn has_border(&self) -> bool {
        [
            self.border_top,
            self.border_right,
            self.border_bottom,
            self.border_left,
        ]
        .iter()
        .any(|b| *b != BorderStyle::None)
    }

    pub fn has_alignment(&self) -> bool {
        self.align_h.is_some() || self.align_v.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Thick,
}

impl BorderStyle {
    /// SpreadsheetML `style` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thin => "thin",
            Self::Thick => "thick",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    Left,
    Center,
}

impl HAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Center, // Note: Excel uses "center" not "middle"
}

impl VAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
        }
    }
}

/// Column width in Excel character units (0-indexed column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColWidth {
    pub col: u32,
    pub width: f64,
}

/// Row height in points (0-indexed row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowHeight {
    pub row: u32,
    pub height: f64,
}
