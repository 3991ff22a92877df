//! Paginated A4 PDF of the sign sheet.
//!
//! Drawn directly from the [`BlockLayout`] with embedded TrueType faces
//! (see [`fonts`]). The page mirrors the HTML document: a banner on the
//! first page, then the blocks two per visual row. A visual row never
//! straddles a page break.

mod fonts;
mod metrics;

use std::collections::BTreeMap;
use std::path::Path;

use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::error::Result;
use crate::layout::{Block, BlockLayout, EdgeWeight, DOCUMENT_BLOCKS_PER_ROW};
use crate::types::DocumentMeta;

pub use fonts::{EmbeddedFont, FontConfig, SheetFonts, DEFAULT_FAMILIES};

use fonts::Face;
use metrics::{clip_to_width, fit_font_size};

const MM: f32 = 72.0 / 25.4;

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN_TOP: f32 = 10.0 * MM;
const MARGIN_RIGHT: f32 = 20.0 * MM;
const MARGIN_BOTTOM: f32 = 20.0 * MM;
const MARGIN_LEFT: f32 = 10.0 * MM;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

// Banner
const BANNER_TOP_GAP: f32 = 15.0;
const BANNER_BOTTOM_GAP: f32 = 22.5;
const TITLE_SIZE: f32 = 13.5;
const BADGE_SIZE: f32 = 9.75;
const BADGE_HEIGHT: f32 = 20.0;
const BADGE_PAD_X: f32 = 13.5;
const BADGE_GAP: f32 = 13.5;
const BADGE_LINE_GAP: f32 = 6.0;

// Blocks
const MAX_BLOCK_WIDTH: f32 = 225.0;
const BLOCK_GAP: f32 = 24.0;
const ROW_GAP: f32 = 24.0;
const HEADER_HEIGHT: f32 = 13.0;
const ROW_HEIGHT: f32 = 13.0;
const CELL_FONT_SIZE: f32 = 6.0;
const MIN_FONT_SIZE: f32 = 4.5;
const CELL_PAD_X: f32 = 4.5;
/// Share of the block width taken by name, surname and the two day columns.
const COLUMN_SHARES: [f32; 4] = [0.28, 0.32, 0.2, 0.2];
const TABLE_COLUMNS: usize = 4;

// Line widths
const THIN_LINE: f32 = 0.5;
const THICK_LINE: f32 = 1.5;

// Gray levels
const INK: f32 = 0.133;
const PLACEHOLDER_INK: f32 = 0.667;
const RULE: f32 = 0.533;
const HEADER_FILL: f32 = 0.878;
const STRIPE_FILL: f32 = 0.965;
const BADGE_FILLED: f32 = 0.878;
const BADGE_EMPTY: f32 = 0.961;

/// Cap height of a sans face as a fraction of the font size.
const CAP_HEIGHT: f32 = 0.72;

const TITLE: &str = "Hoja de Firmas";

const DEFLATE_LEVEL: u8 = 6;

/// Glyphs shown per face, with the character each one stands for.
#[derive(Debug, Default)]
struct UsedGlyphs {
    regular: BTreeMap<u16, char>,
    bold: BTreeMap<u16, char>,
}

impl UsedGlyphs {
    fn of(&self, face: Face) -> &BTreeMap<u16, char> {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }

    fn of_mut(&mut self, face: Face) -> &mut BTreeMap<u16, char> {
        match face {
            Face::Regular => &mut self.regular,
            Face::Bold => &mut self.bold,
        }
    }
}

/// Accumulates page content streams, top to bottom.
///
/// Coordinates passed to the drawing helpers are measured from the top
/// of the page; they are flipped to PDF space on output.
struct SheetPainter<'f> {
    fonts: &'f SheetFonts,
    used: UsedGlyphs,
    pages: Vec<Content>,
    current: Content,
    /// Distance from the top of the page to the next free line.
    cursor: f32,
}

impl<'f> SheetPainter<'f> {
    fn new(fonts: &'f SheetFonts) -> Self {
        Self {
            fonts,
            used: UsedGlyphs::default(),
            pages: Vec::new(),
            current: Content::new(),
            cursor: MARGIN_TOP,
        }
    }

    fn is_page_empty(&self) -> bool {
        self.cursor <= MARGIN_TOP
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor + height <= PAGE_HEIGHT - MARGIN_BOTTOM
    }

    fn new_page(&mut self) {
        let finished = std::mem::replace(&mut self.current, Content::new());
        self.pages.push(finished);
        self.cursor = MARGIN_TOP;
    }

    fn finish(mut self) -> (Vec<Content>, UsedGlyphs) {
        self.pages.push(self.current);
        (self.pages, self.used)
    }

    fn fill_rect(&mut self, x: f32, top: f32, w: f32, h: f32, gray: f32) {
        self.current
            .save_state()
            .set_fill_gray(gray)
            .rect(x, PAGE_HEIGHT - top - h, w, h)
            .fill_nonzero()
            .restore_state();
    }

    fn stroke_rect(&mut self, x: f32, top: f32, w: f32, h: f32, width: f32) {
        self.current
            .save_state()
            .set_line_width(width)
            .set_stroke_gray(RULE)
            .rect(x, PAGE_HEIGHT - top - h, w, h)
            .stroke()
            .restore_state();
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), weight: EdgeWeight) {
        let width = match weight {
            EdgeWeight::Thin => THIN_LINE,
            EdgeWeight::Thick => THICK_LINE,
        };
        self.current
            .save_state()
            .set_line_width(width)
            .set_stroke_gray(RULE)
            .move_to(from.0, PAGE_HEIGHT - from.1)
            .line_to(to.0, PAGE_HEIGHT - to.1)
            .stroke()
            .restore_state();
    }

    /// Show `text` with its baseline at `baseline` (from the page top).
    fn text(&mut self, face: Face, size: f32, x: f32, baseline: f32, gray: f32, text: &str) {
        let fonts = self.fonts;
        let encoded = fonts.face(face).encode(text, self.used.of_mut(face));
        self.current
            .begin_text()
            .set_font(Name(face.resource_name()), size)
            .set_fill_gray(gray)
            .next_line(x, PAGE_HEIGHT - baseline)
            .show(Str(&encoded))
            .end_text();
    }

    /// Text vertically centred in a cell, shrunk or clipped to its width.
    #[allow(clippy::too_many_arguments)]
    fn cell_text(
        &mut self,
        face: Face,
        x: f32,
        top: f32,
        w: f32,
        h: f32,
        gray: f32,
        centered: bool,
        text: &str,
    ) {
        if text.is_empty() {
            return;
        }
        let fonts = self.fonts;
        let font = fonts.face(face);
        let avail = (w - 2.0 * CELL_PAD_X).max(0.0);
        let size = fit_font_size(font, text, avail, CELL_FONT_SIZE, MIN_FONT_SIZE);
        let shown = clip_to_width(font, text, avail, size);
        let offset = if centered {
            (w - font.text_width(shown, size)) / 2.0
        } else {
            CELL_PAD_X
        };
        let baseline = top + (h + size * CAP_HEIGHT) / 2.0;
        self.text(face, size, x + offset, baseline, gray, shown);
    }

    fn draw_banner(&mut self, meta: &DocumentMeta) {
        let fonts = self.fonts;
        let bold = fonts.face(Face::Bold);
        let top = self.cursor + BANNER_TOP_GAP;
        let title_baseline = top + (BADGE_HEIGHT + TITLE_SIZE * CAP_HEIGHT) / 2.0;
        self.text(Face::Bold, TITLE_SIZE, MARGIN_LEFT, title_baseline, INK, TITLE);

        let week = meta.week.map(|w| format!("Semana {w}"));
        let badges = [
            (meta.subject.as_deref(), "Asignatura"),
            (meta.group.as_deref(), "Grupo"),
            (None, "Fecha"),
            (week.as_deref(), "Semana"),
        ];

        let right_edge = MARGIN_LEFT + CONTENT_WIDTH;
        let mut x = MARGIN_LEFT + bold.text_width(TITLE, TITLE_SIZE) + BADGE_GAP;
        let mut line_top = top;
        for (value, placeholder) in badges {
            let (label, fill, ink) = match value {
                Some(v) => (v, BADGE_FILLED, INK),
                None => (placeholder, BADGE_EMPTY, PLACEHOLDER_INK),
            };
            let label = clip_to_width(bold, label, CONTENT_WIDTH - 2.0 * BADGE_PAD_X, BADGE_SIZE);
            let w = bold.text_width(label, BADGE_SIZE) + 2.0 * BADGE_PAD_X;
            if x + w > right_edge && x > MARGIN_LEFT {
                x = MARGIN_LEFT;
                line_top += BADGE_HEIGHT + BADGE_LINE_GAP;
            }
            self.fill_rect(x, line_top, w, BADGE_HEIGHT, fill);
            self.stroke_rect(x, line_top, w, BADGE_HEIGHT, THIN_LINE);
            let baseline = line_top + (BADGE_HEIGHT + BADGE_SIZE * CAP_HEIGHT) / 2.0;
            self.text(Face::Bold, BADGE_SIZE, x + BADGE_PAD_X, baseline, ink, label);
            x += w + BADGE_GAP;
        }

        self.cursor = line_top + BADGE_HEIGHT + BANNER_BOTTOM_GAP;
    }

    fn draw_block(&mut self, block: &Block<'_>, x: f32, top: f32, width: f32, meta: &DocumentMeta) {
        let [a, b, c, d] = COLUMN_SHARES;
        let [x0, x1, x2, x3, x4] = [
            x,
            x + a * width,
            x + (a + b) * width,
            x + (a + b + c) * width,
            x + (a + b + c + d) * width,
        ];
        let columns = [(x0, x1), (x1, x2), (x2, x3), (x3, x4)];

        // Header
        self.fill_rect(x, top, width, HEADER_HEIGHT, HEADER_FILL);
        let headers = [("Nombre", x0, x1), ("Apellidos", x1, x2), ("Firma", x2, x4)];
        for (label, from, to) in headers {
            self.cell_text(Face::Bold, from, top, to - from, HEADER_HEIGHT, INK, true, label);
        }
        self.line((x0, top), (x4, top), EdgeWeight::Thick);
        self.line((x0, top), (x0, top + HEADER_HEIGHT), EdgeWeight::Thick);
        self.line((x4, top), (x4, top + HEADER_HEIGHT), EdgeWeight::Thick);
        self.line((x1, top), (x1, top + HEADER_HEIGHT), EdgeWeight::Thin);
        self.line((x2, top), (x2, top + HEADER_HEIGHT), EdgeWeight::Thin);

        // Participant rows
        let [day1, day2] = [&meta.day_labels.first, &meta.day_labels.second];
        for block_row in block.rows() {
            let row_top = top + HEADER_HEIGHT + block_row.row as f32 * ROW_HEIGHT;
            let row_bottom = row_top + ROW_HEIGHT;
            if block_row.row % 2 == 0 {
                self.fill_rect(x, row_top, width, ROW_HEIGHT, STRIPE_FILL);
            }

            let participant = block_row.participant;
            let cells = [
                (participant.first_name.as_str(), INK),
                (participant.last_name.as_str(), INK),
                (day1.as_str(), PLACEHOLDER_INK),
                (day2.as_str(), PLACEHOLDER_INK),
            ];
            for (col, ((text, ink), (left, right))) in cells.into_iter().zip(columns).enumerate() {
                self.cell_text(Face::Regular, left, row_top, right - left, ROW_HEIGHT, ink, false, text);

                let edges = block_row.edges(col, TABLE_COLUMNS);
                self.line((left, row_top), (right, row_top), edges.top);
                self.line((left, row_top), (left, row_bottom), edges.left);
                if col + 1 == TABLE_COLUMNS {
                    self.line((right, row_top), (right, row_bottom), edges.right);
                }
                if block_row.is_last {
                    self.line((left, row_bottom), (right, row_bottom), edges.bottom);
                }
            }
        }
    }
}

/// Width of one block when `per_row` blocks share the content width.
fn block_width(per_row: usize) -> f32 {
    let per_row = per_row.max(1) as f32;
    ((CONTENT_WIDTH - BLOCK_GAP * (per_row - 1.0)) / per_row).min(MAX_BLOCK_WIDTH)
}

struct RefAllocator {
    next: i32,
}

impl RefAllocator {
    fn new() -> Self {
        Self { next: 1 }
    }

    fn next_ref(&mut self) -> Ref {
        let r = Ref::new(self.next);
        self.next += 1;
        r
    }
}

/// Render the sign sheet as PDF bytes.
///
/// Blocks are always laid two per visual row, whatever arrangement the
/// spreadsheet uses. An empty layout yields a single page with the
/// banner only.
pub fn render_pdf(
    layout: &BlockLayout<'_>,
    meta: &DocumentMeta,
    fonts: &SheetFonts,
) -> Result<Vec<u8>> {
    let mut painter = SheetPainter::new(fonts);
    painter.draw_banner(meta);

    let width = block_width(DOCUMENT_BLOCKS_PER_ROW);
    for row in layout.document_rows() {
        let tallest = row.iter().map(Block::len).max().unwrap_or(0);
        let height = HEADER_HEIGHT + tallest as f32 * ROW_HEIGHT;
        if !painter.fits(height) && !painter.is_page_empty() {
            painter.new_page();
        }
        let top = painter.cursor;
        for (slot, block) in row.iter().enumerate() {
            let x = MARGIN_LEFT + slot as f32 * (width + BLOCK_GAP);
            painter.draw_block(block, x, top, width, meta);
        }
        painter.cursor = top + height + ROW_GAP;
    }

    let (pages, used) = painter.finish();
    debug!(
        "drew {} blocks on {} PDF pages with {} glyphs",
        layout.block_count(),
        pages.len(),
        used.regular.len() + used.bold.len()
    );
    write_document(pages, fonts, &used)
}

fn write_document(
    pages: Vec<Content>,
    fonts: &SheetFonts,
    used: &UsedGlyphs,
) -> Result<Vec<u8>> {
    let mut refs = RefAllocator::new();
    let catalog_id = refs.next_ref();
    let page_tree_id = refs.next_ref();
    let info_id = refs.next_ref();
    let regular_id = refs.next_ref();
    let bold_id = refs.next_ref();
    let page_ids: Vec<Ref> = pages.iter().map(|_| refs.next_ref()).collect();

    let mut writer = Pdf::new();
    writer.catalog(catalog_id).pages(page_tree_id);
    writer
        .pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(i32::try_from(page_ids.len()).unwrap_or(i32::MAX));
    writer
        .document_info(info_id)
        .title(TextStr(TITLE))
        .creator(TextStr("firmas"));

    for (font_id, face) in [(regular_id, Face::Regular), (bold_id, Face::Bold)] {
        write_font(&mut writer, &mut refs, font_id, face, fonts.face(face), used.of(face))?;
    }

    for (content, page_id) in pages.into_iter().zip(page_ids) {
        let content_id = refs.next_ref();

        let mut page = writer.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(page_tree_id)
            .contents(content_id);
        page.resources()
            .fonts()
            .pair(Name(Face::Regular.resource_name()), regular_id)
            .pair(Name(Face::Bold.resource_name()), bold_id);
        page.finish();

        writer.stream(content_id, &content.finish());
    }

    Ok(writer.finish())
}

/// Embed `font` as a Type0 font over an Identity-H CID font, subset to the
/// glyphs actually shown.
fn write_font(
    writer: &mut Pdf,
    refs: &mut RefAllocator,
    font_id: Ref,
    face: Face,
    font: &EmbeddedFont,
    glyphs: &BTreeMap<u16, char>,
) -> Result<()> {
    let cid_id = refs.next_ref();
    let descriptor_id = refs.next_ref();
    let cmap_id = refs.next_ref();
    let file_id = refs.next_ref();

    let base_font = Name(font.name().as_bytes());
    let system_info = SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    };

    writer
        .type0_font(font_id)
        .base_font(base_font)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_id)
        .to_unicode(cmap_id);

    let mut cid_font = writer.cid_font(cid_id);
    cid_font
        .subtype(CidFontType::Type2)
        .base_font(base_font)
        .system_info(system_info)
        .font_descriptor(descriptor_id)
        .default_width(font.advance(0))
        .cid_to_gid_map_predefined(Name(b"Identity"));
    let mut widths = cid_font.widths();
    for &glyph in glyphs.keys() {
        widths.consecutive(glyph, [font.advance(glyph)]);
    }
    widths.finish();
    cid_font.finish();

    let [x1, y1, x2, y2] = font.bbox(glyphs.keys().copied());
    writer
        .font_descriptor(descriptor_id)
        .name(base_font)
        .flags(FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(x1, y1, x2, y2))
        .italic_angle(0.0)
        .ascent(font.ascent())
        .descent(font.descent())
        .cap_height(CAP_HEIGHT * 1000.0)
        .stem_v(80.0)
        .font_file2(file_id);

    let mut cmap = UnicodeCmap::new(Name(face.cmap_name()), system_info);
    for (&glyph, &c) in glyphs {
        cmap.pair(glyph, c);
    }
    writer.stream(cmap_id, &cmap.finish());

    let keep: Vec<u16> = std::iter::once(0)
        .chain(glyphs.keys().copied().filter(|&g| g != 0))
        .collect();
    let program = font.subset(&keep)?;
    let compressed = compress_to_vec_zlib(&program, DEFLATE_LEVEL);
    writer
        .stream(file_id, &compressed)
        .filter(Filter::FlateDecode)
        .pair(
            Name(b"Length1"),
            i32::try_from(program.len()).unwrap_or(i32::MAX),
        );
    Ok(())
}

/// Render and write the PDF document to `path`.
pub fn save_pdf(
    layout: &BlockLayout<'_>,
    meta: &DocumentMeta,
    fonts: &SheetFonts,
    path: &Path,
) -> Result<()> {
    let bytes = render_pdf(layout, meta, fonts)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
