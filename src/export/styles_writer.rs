//! Collects cell styles into a deduplicated `xl/styles.xml`.
//!
//! Index 0 of every table is the workbook default, so unstyled cells
//! need no `s` attribute.

use std::collections::HashMap;

use crate::types::{BorderStyle, CellStyle};

const DEFAULT_FONT_NAME: &str = "Calibri";
const DEFAULT_FONT_SIZE: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FontDef {
    bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BorderDef {
    left: BorderStyle,
    right: BorderStyle,
    top: BorderStyle,
    bottom: BorderStyle,
}

#[derive(Debug, Clone)]
struct CellXfDef {
    font_id: usize,
    border_id: usize,
    style: CellStyle,
}

/// Deduplicating builder for the workbook style tables.
#[derive(Debug)]
pub(crate) struct StylesCollector {
    fonts: Vec<FontDef>,
    borders: Vec<BorderDef>,
    cell_xfs: Vec<CellXfDef>,
    style_map: HashMap<CellStyle, usize>,
}

impl StylesCollector {
    pub(crate) fn new() -> Self {
        let default_style = CellStyle::default();
        let mut style_map = HashMap::new();
        style_map.insert(default_style.clone(), 0);

        Self {
            fonts: vec![FontDef { bold: false }],
            borders: vec![BorderDef {
                left: BorderStyle::None,
                right: BorderStyle::None,
                top: BorderStyle::None,
                bottom: BorderStyle::None,
            }],
            cell_xfs: vec![CellXfDef {
                font_id: 0,
                border_id: 0,
                style: default_style,
            }],
            style_map,
        }
    }

    /// Register `style`, returning its `cellXfs` index.
    pub(crate) fn add_style(&mut self, style: &CellStyle) -> usize {
        if let Some(&idx) = self.style_map.get(style) {
            return idx;
        }

        let font_id = self.add_font(style);
        let border_id = self.add_border(style);

        let idx = self.cell_xfs.len();
        self.cell_xfs.push(CellXfDef {
            font_id,
            border_id,
            style: style.clone(),
        });
        self.style_map.insert(style.clone(), idx);
        idx
    }

    /// Index of a registered style; unknown styles fall back to the default.
    pub(crate) fn style_index(&self, style: &CellStyle) -> usize {
        self.style_map.get(style).copied().unwrap_or(0)
    }

    fn add_font(&mut self, style: &CellStyle) -> usize {
        let font = FontDef { bold: style.bold };
        intern(&mut self.fonts, font)
    }

    fn add_border(&mut self, style: &CellStyle) -> usize {
        if !style.has_border() {
            return 0;
        }
        let border = BorderDef {
            left: style.border_left,
            right: style.border_right,
            top: style.border_top,
            bottom: style.border_bottom,
        };
        intern(&mut self.borders, border)
    }

    pub(crate) fn generate_styles_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        // Fonts
        xml.push_str(&format!(r#"<fonts count="{}">"#, self.fonts.len()));
        for font in &self.fonts {
            xml.push_str("<font>");
            if font.bold {
                xml.push_str("<b/>");
            }
            xml.push_str(&format!(r#"<sz val="{DEFAULT_FONT_SIZE}"/>"#));
            xml.push_str(&format!(r#"<name val="{DEFAULT_FONT_NAME}"/>"#));
            xml.push_str("</font>");
        }
        xml.push_str("</fonts>");

        // Fills: the two entries every workbook must carry
        xml.push_str(r#"<fills count="2">"#);
        xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
        xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
        xml.push_str("</fills>");

        // Borders
        xml.push_str(&format!(r#"<borders count="{}">"#, self.borders.len()));
        for border in &self.borders {
            xml.push_str("<border>");
            xml.push_str(&format_border_side("left", border.left));
            xml.push_str(&format_border_side("right", border.right));
            xml.push_str(&format_border_side("top", border.top));
            xml.push_str(&format_border_side("bottom", border.bottom));
            xml.push_str("<diagonal/>");
            xml.push_str("</border>");
        }
        xml.push_str("</borders>");

        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        // Cell formats
        xml.push_str(&format!(r#"<cellXfs count="{}">"#, self.cell_xfs.len()));
        for xf in &self.cell_xfs {
            let mut attrs = format!(
                r#"numFmtId="0" fontId="{}" fillId="0" borderId="{}" xfId="0""#,
                xf.font_id, xf.border_id
            );
            if xf.font_id > 0 {
                attrs.push_str(r#" applyFont="1""#);
            }
            if xf.border_id > 0 {
                attrs.push_str(r#" applyBorder="1""#);
            }

            if xf.style.has_alignment() {
                attrs.push_str(r#" applyAlignment="1""#);
                xml.push_str(&format!("<xf {attrs}>"));
                let mut align_attrs = String::new();
                if let Some(h) = xf.style.align_h {
                    align_attrs.push_str(&format!(r#" horizontal="{}""#, h.as_str()));
                }
                if let Some(v) = xf.style.align_v {
                    align_attrs.push_str(&format!(r#" vertical="{}""#, v.as_str()));
                }
                xml.push_str(&format!("<alignment{align_attrs}/>"));
                xml.push_str("</xf>");
            } else {
                xml.push_str(&format!("<xf {attrs}/>"));
            }
        }
        xml.push_str("</cellXfs>");

        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);

        xml.push_str("</styleSheet>");
        xml
    }
}

/// Index of `item` in `table`, appending it first if absent.
fn intern<T: PartialEq>(table: &mut Vec<T>, item: T) -> usize {
    if let Some(idx) = table.iter().position(|existing| *existing == item) {
        return idx;
    }
    table.push(item);
    table.len() - 1
}

fn format_border_side(name: &str, style: BorderStyle) -> String {
    match style {
        BorderStyle::None => format!("<{name}/>"),
        other => format!(
            r#"<{name} style="{}"><color auto="1"/></{name}>"#,
            other.as_str()
        ),
    }
}
