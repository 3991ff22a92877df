//! Common test utilities: reading generated XLSX packages and PDFs back.
//!
//! The XLSX helpers pull parts out of the ZIP and walk them with quick-xml,
//! so assertions run against what a spreadsheet application would actually
//! load rather than against the in-memory sheet model. The PDF helpers
//! decode the text shown on each page through the fonts' `ToUnicode` maps.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Package Access
// ============================================================================

/// Names of every part in the package.
#[must_use]
pub fn part_names(xlsx: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(xlsx)).expect("open ZIP archive");
    archive.file_names().map(str::to_string).collect()
}

/// Read one part of the package as UTF-8 text.
#[must_use]
pub fn read_part(xlsx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).expect("open ZIP archive");
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("missing part {name}: {e}"));
    let mut content = String::new();
    file.read_to_string(&mut content).expect("read part");
    content
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(Result::ok)
        .find(|a| a.key.as_ref() == key)
        .map(|a| a.unescape_value().expect("attribute value").into_owned())
}

// ============================================================================
// Workbook
// ============================================================================

/// Sheet names in workbook order.
#[must_use]
pub fn sheet_names(xlsx: &[u8]) -> Vec<String> {
    let xml = read_part(xlsx, "xl/workbook.xml");
    let mut reader = Reader::from_str(&xml);
    reader.trim_text(true);

    let mut names = Vec::new();
    loop {
        match reader.read_event().expect("workbook.xml") {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"sheet" => {
                names.push(attr(&e, b"name").expect("sheet name"));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    names
}

// ============================================================================
// Worksheet Cells
// ============================================================================

/// One `<c>` element of the first worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XlsxCell {
    pub reference: String,
    /// `cellXfs` index (0 when the `s` attribute is absent).
    pub style: usize,
    pub text: Option<String>,
}

/// Every cell of `xl/worksheets/sheet1.xml`, in document order.
#[must_use]
pub fn sheet_cells(xlsx: &[u8]) -> Vec<XlsxCell> {
    let xml = read_part(xlsx, "xl/worksheets/sheet1.xml");
    let mut reader = Reader::from_str(&xml);
    reader.trim_text(true);

    let mut cells = Vec::new();
    let mut current: Option<XlsxCell> = None;
    let mut in_text = false;
    loop {
        match reader.read_event().expect("sheet1.xml") {
            Event::Empty(e) if e.name().as_ref() == b"c" => cells.push(cell_from(&e)),
            Event::Start(e) if e.name().as_ref() == b"c" => current = Some(cell_from(&e)),
            Event::Start(e) if e.name().as_ref() == b"t" => in_text = true,
            Event::Text(t) if in_text => {
                if let Some(cell) = current.as_mut() {
                    cell.text = Some(t.unescape().expect("cell text").into_owned());
                }
            }
            Event::End(e) if e.name().as_ref() == b"t" => in_text = false,
            Event::End(e) if e.name().as_ref() == b"c" => {
                cells.extend(current.take());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    cells
}

fn cell_from(e: &BytesStart<'_>) -> XlsxCell {
    XlsxCell {
        reference: attr(e, b"r").expect("cell reference"),
        style: attr(e, b"s").map_or(0, |s| s.parse().expect("style index")),
        text: None,
    }
}

/// Find a cell by reference (`"A2"`).
#[must_use]
pub fn cell<'a>(cells: &'a [XlsxCell], reference: &str) -> Option<&'a XlsxCell> {
    cells.iter().find(|c| c.reference == reference)
}

/// Text of the cell at `reference`, if it has any.
#[must_use]
pub fn cell_text(cells: &[XlsxCell], reference: &str) -> Option<String> {
    cell(cells, reference).and_then(|c| c.text.clone())
}

/// Row numbers (1-based) that carry a `<row>` element.
#[must_use]
pub fn row_numbers(xlsx: &[u8]) -> Vec<u32> {
    let xml = read_part(xlsx, "xl/worksheets/sheet1.xml");
    let mut reader = Reader::from_str(&xml);
    reader.trim_text(true);

    let mut rows = Vec::new();
    loop {
        match reader.read_event().expect("sheet1.xml") {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"row" => {
                rows.push(attr(&e, b"r").expect("row number").parse().expect("row number"));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    rows
}

// ============================================================================
// Styles
// ============================================================================

/// Border style names (`"thin"`, `"thick"`) per side; `None` for no border.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderSides {
    pub left: Option<String>,
    pub right: Option<String>,
    pub top: Option<String>,
    pub bottom: Option<String>,
}

/// Parsed view of `xl/styles.xml`.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    pub borders: Vec<BorderSides>,
    /// `(fontId, borderId)` per `cellXfs` entry.
    pub cell_xfs: Vec<(usize, usize)>,
    /// Whether each font is bold.
    pub bold_fonts: Vec<bool>,
}

impl StyleTable {
    #[must_use]
    pub fn parse(xlsx: &[u8]) -> Self {
        let xml = read_part(xlsx, "xl/styles.xml");
        let mut reader = Reader::from_str(&xml);
        reader.trim_text(true);

        let mut table = Self::default();
        let mut in_cell_xfs = false;
        let mut in_fonts = false;
        loop {
            match reader.read_event().expect("styles.xml") {
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"fonts" => in_fonts = true,
                    b"font" if in_fonts => table.bold_fonts.push(false),
                    b"b" if in_fonts => {
                        if let Some(last) = table.bold_fonts.last_mut() {
                            *last = true;
                        }
                    }
                    b"border" => table.borders.push(BorderSides::default()),
                    side @ (b"left" | b"right" | b"top" | b"bottom") => {
                        let style = attr(&e, b"style");
                        let border = table.borders.last_mut().expect("side outside border");
                        match side {
                            b"left" => border.left = style,
                            b"right" => border.right = style,
                            b"top" => border.top = style,
                            _ => border.bottom = style,
                        }
                    }
                    b"cellXfs" => in_cell_xfs = true,
                    b"xf" if in_cell_xfs => {
                        let font = attr(&e, b"fontId").map_or(0, |v| v.parse().expect("fontId"));
                        let border =
                            attr(&e, b"borderId").map_or(0, |v| v.parse().expect("borderId"));
                        table.cell_xfs.push((font, border));
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"fonts" => in_fonts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        table
    }

    /// Borders applied by a `cellXfs` index.
    #[must_use]
    pub fn borders_of(&self, style: usize) -> BorderSides {
        let (_, border) = self.cell_xfs[style];
        self.borders[border].clone()
    }

    #[must_use]
    pub fn is_bold(&self, style: usize) -> bool {
        let (font, _) = self.cell_xfs[style];
        self.bold_fonts[font]
    }
}

/// Borders of the cell at `reference`.
#[must_use]
pub fn cell_borders(xlsx: &[u8], reference: &str) -> BorderSides {
    let cells = sheet_cells(xlsx);
    let c = cell(&cells, reference).unwrap_or_else(|| panic!("no cell at {reference}"));
    StyleTable::parse(xlsx).borders_of(c.style)
}

/// Shorthand for asserting a side's border style.
#[must_use]
pub fn side(style: &str) -> Option<String> {
    Some(style.to_string())
}

// ============================================================================
// PDF Text
// ============================================================================

/// Text runs shown on the pages of a generated PDF, in drawing order.
///
/// Each `Tj` string is decoded with the `ToUnicode` map of the font
/// selected before it, which is what a viewer copies out of the page.
/// Glyphs without a mapping come out as U+FFFD.
#[must_use]
pub fn pdf_text_runs(pdf: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(pdf);
    let maps = to_unicode_maps(&text);
    let mut font = String::new();
    let mut runs = Vec::new();
    for line in text.lines() {
        if let Some(operands) = line.strip_suffix(" Tf") {
            let name = operands.split_whitespace().next().unwrap_or("");
            font = name.trim_start_matches('/').to_string();
        } else if let Some(operand) = line.strip_suffix(" Tj") {
            let Some(bytes) = decode_pdf_string(operand) else {
                continue;
            };
            let map = maps.get(&format!("{font}-UCS"));
            let run = bytes
                .chunks(2)
                .map(|pair| {
                    let glyph = u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]);
                    map.and_then(|m| m.get(&glyph)).copied().unwrap_or('\u{FFFD}')
                })
                .collect();
            runs.push(run);
        }
    }
    runs
}

/// Glyph-to-character maps keyed by CMap name.
fn to_unicode_maps(text: &str) -> HashMap<String, HashMap<u16, char>> {
    let mut maps = HashMap::new();
    for resource in text.split("%%BeginResource: CMap ").skip(1) {
        let Some((name, body)) = resource.split_once('\n') else {
            continue;
        };
        let body = body.split("endcmap").next().unwrap_or("");
        let mut map = HashMap::new();
        let mut in_bfchar = false;
        for line in body.lines().map(str::trim) {
            if line.ends_with("beginbfchar") {
                in_bfchar = true;
            } else if line == "endbfchar" {
                in_bfchar = false;
            } else if in_bfchar {
                if let Some((glyph, c)) = parse_bfchar(line) {
                    map.insert(glyph, c);
                }
            }
        }
        maps.insert(name.trim().to_string(), map);
    }
    maps
}

/// One `<glyph> <utf16>` line of a `bfchar` section.
fn parse_bfchar(line: &str) -> Option<(u16, char)> {
    let strip = |s: &str| s.trim_matches(|c| c == '<' || c == '>').to_string();
    let mut parts = line.split_whitespace();
    let glyph = u16::from_str_radix(&strip(parts.next()?), 16).ok()?;
    let hex = strip(parts.next()?);
    let units: Vec<u16> = (0..hex.len())
        .step_by(4)
        .filter_map(|i| hex.get(i..i + 4))
        .filter_map(|unit| u16::from_str_radix(unit, 16).ok())
        .collect();
    let c = char::decode_utf16(units).next()?.ok()?;
    Some((glyph, c))
}

/// Bytes of a PDF literal `(...)` or hex `<...>` string operand.
fn decode_pdf_string(operand: &str) -> Option<Vec<u8>> {
    let operand = operand.trim();
    if let Some(hex) = operand.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        return (0..hex.len())
            .step_by(2)
            .map(|i| hex.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
            .collect();
    }
    let literal = operand.strip_prefix('(')?.strip_suffix(')')?;
    let mut out = Vec::new();
    let mut chars = literal.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(u8::try_from(c).ok()?);
            continue;
        }
        let escaped = chars.next()?;
        match escaped {
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            '0'..='7' => {
                let mut value = escaped.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(u8::try_from(value).ok()?);
            }
            other => out.push(u8::try_from(other).ok()?),
        }
    }
    Some(out)
}
