//! Generates worksheet XML from a `Sheet` struct.
//!
//! Text cells use inline strings (`t="inlineStr"`), so the package needs
//! no shared string table.

use quick_xml::escape::escape;

use crate::cell_ref::{col_to_letter, to_cell_ref};
use crate::types::{CellData, Sheet};

use super::styles_writer::StylesCollector;

/// Write a complete worksheet XML string from a `Sheet`.
///
/// Every style used by the sheet must already be registered in `styles`.
pub(crate) fn write_sheet_xml(sheet: &Sheet, styles: &StylesCollector) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    out.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');

    // <dimension>
    if sheet.max_row > 0 && sheet.max_col > 0 {
        let end_col = col_to_letter(sheet.max_col.saturating_sub(1));
        out.push_str(&format!(
            "<dimension ref=\"A1:{}{}\"/>\n",
            end_col, sheet.max_row
        ));
    }

    // <sheetFormatPr>
    out.push_str(&format!(
        "<sheetFormatPr defaultRowHeight=\"{:.2}\" defaultColWidth=\"{:.4}\"/>\n",
        sheet.default_row_height, sheet.default_col_width
    ));

    // <cols>
    if !sheet.col_widths.is_empty() {
        let mut widths: Vec<_> = sheet.col_widths.iter().collect();
        widths.sort_by_key(|cw| cw.col);
        out.push_str("<cols>\n");
        for cw in widths {
            let col1 = cw.col + 1; // XLSX is 1-based
            out.push_str(&format!(
                "<col min=\"{col1}\" max=\"{col1}\" width=\"{:.4}\" customWidth=\"1\"/>\n",
                cw.width
            ));
        }
        out.push_str("</cols>\n");
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    write_sheet_data(&mut out, sheet, styles);
    out.push_str("</sheetData>\n");

    out.push_str("</worksheet>");
    out
}

/// Write all cell rows into `<sheetData>`.
fn write_sheet_data(out: &mut String, sheet: &Sheet, styles: &StylesCollector) {
    let cells = sheet.sorted_cells();

    // Group cells by row
    let mut rows: Vec<(u32, Vec<&CellData>)> = Vec::new();
    for cd in cells {
        if let Some(last) = rows.last_mut() {
            if last.0 == cd.r {
                last.1.push(cd);
                continue;
            }
        }
        rows.push((cd.r, vec![cd]));
    }

    for (row, row_cells) in &rows {
        out.push_str(&format!("<row r=\"{}\"", row + 1));
        if let Some(h) = sheet.row_height(*row) {
            out.push_str(&format!(" ht=\"{h:.2}\" customHeight=\"1\""));
        }
        out.push('>');

        for cd in row_cells {
            write_cell(out, cd, styles);
        }

        out.push_str("</row>\n");
    }
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, cd: &CellData, styles: &StylesCollector) {
    out.push_str(&format!("<c r=\"{}\"", to_cell_ref(cd.r, cd.c)));

    let si = styles.style_index(&cd.cell.style);
    if si > 0 {
        out.push_str(&format!(" s=\"{si}\""));
    }

    match cd.cell.v.as_deref() {
        Some(text) => {
            out.push_str(" t=\"inlineStr\"><is><t xml:space=\"preserve\">");
            out.push_str(&escape(text));
            out.push_str("</t></is></c>");
        }
        None => out.push_str("/>"),
    }
}
