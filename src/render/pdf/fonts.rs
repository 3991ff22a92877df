//! TrueType faces embedded in the PDF.
//!
//! Text is shown as two-byte glyph ids through `Identity-H`, so every
//! character the face covers reaches the page intact. Faces come from
//! configured font files or from the system font database.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, GlyphId};
use fontdb::{Database, Family, Query, Weight, ID};
use serde::{Deserialize, Serialize};
use subsetter::Profile;
use tracing::{debug, warn};

use crate::error::{FirmasError, Result};

/// Sans-serif families searched, in order, when no font file is configured.
pub const DEFAULT_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Noto Sans",
    "FreeSans",
    "Helvetica",
];

/// Drawn in place of characters the face has no glyph for.
const REPLACEMENT: char = '?';

/// Where the PDF faces come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType file for names and day labels. Skips the family search.
    pub regular: Option<PathBuf>,
    /// TrueType file for headers and the banner. Falls back to `regular`.
    pub bold: Option<PathBuf>,
    /// Family names looked up in the system font database.
    pub families: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: None,
            bold: None,
            families: DEFAULT_FAMILIES.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

impl FontConfig {
    pub fn validate(&self) -> Result<()> {
        if self.regular.is_none() && self.bold.is_some() {
            return Err(FirmasError::Config(
                "a bold font file needs a regular font file".into(),
            ));
        }
        if self.regular.is_none() && self.families.iter().all(|f| f.trim().is_empty()) {
            return Err(FirmasError::Config(
                "no font file and no font families configured".into(),
            ));
        }
        Ok(())
    }
}

/// The two faces drawn on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Regular,
    Bold,
}

impl Face {
    /// Resource name on every page.
    pub(crate) fn resource_name(self) -> &'static [u8] {
        match self {
            Self::Regular => b"F1",
            Self::Bold => b"F2",
        }
    }

    /// Name of the face's `ToUnicode` CMap.
    pub(crate) fn cmap_name(self) -> &'static [u8] {
        match self {
            Self::Regular => b"F1-UCS",
            Self::Bold => b"F2-UCS",
        }
    }
}

/// A parsed TrueType face ready for embedding.
pub struct EmbeddedFont {
    name: String,
    font: FontVec,
    index: u32,
    /// Font units to thousandths of an em.
    scale: f32,
}

impl fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("name", &self.name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl EmbeddedFont {
    /// Parse face `index` of `data`. CFF-flavoured fonts are rejected.
    pub fn from_data(name: impl Into<String>, data: Vec<u8>, index: u32) -> Result<Self> {
        let name = name.into();
        if data.starts_with(b"OTTO") {
            return Err(FirmasError::Render(format!(
                "{name} has CFF outlines; a TrueType font is required"
            )));
        }
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|e| FirmasError::Render(format!("invalid font {name}: {e}")))?;
        let units_per_em = font
            .units_per_em()
            .filter(|units| *units > 0.0)
            .ok_or_else(|| FirmasError::Render(format!("{name} has no units per em")))?;
        Ok(Self {
            name,
            font,
            index,
            scale: 1000.0 / units_per_em,
        })
    }

    /// Load the first face of a font file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut db = Database::new();
        db.load_font_file(path)?;
        let id = db
            .faces()
            .next()
            .map(|face| face.id)
            .ok_or_else(|| FirmasError::Render(format!("no font face in {}", path.display())))?;
        load_face(&db, id)
    }

    /// PostScript name, used as the PDF base font.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Glyph drawn for `c`, and the character it stands for.
    pub(crate) fn resolve(&self, c: char) -> (u16, char) {
        let id = self.font.glyph_id(c);
        if id.0 != 0 {
            return (id.0, c);
        }
        (self.font.glyph_id(REPLACEMENT).0, REPLACEMENT)
    }

    /// `text` as big-endian glyph ids, recording each glyph in `used`.
    pub(crate) fn encode(&self, text: &str, used: &mut BTreeMap<u16, char>) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 * text.len());
        for c in text.chars() {
            let (glyph, shown) = self.resolve(c);
            used.entry(glyph).or_insert(shown);
            out.extend_from_slice(&glyph.to_be_bytes());
        }
        out
    }

    /// Advance width of `glyph` in thousandths of an em.
    pub(crate) fn advance(&self, glyph: u16) -> f32 {
        self.font.h_advance_unscaled(GlyphId(glyph)) * self.scale
    }

    /// Width of `c` in points at `size`.
    pub(crate) fn char_width(&self, c: char, size: f32) -> f32 {
        self.advance(self.resolve(c).0) * size / 1000.0
    }

    /// Width of `text` in points at `size`.
    pub(crate) fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c, size)).sum()
    }

    pub(crate) fn ascent(&self) -> f32 {
        self.font.ascent_unscaled() * self.scale
    }

    pub(crate) fn descent(&self) -> f32 {
        self.font.descent_unscaled() * self.scale
    }

    /// Union of the outline bounds of `glyphs` as `[x1, y1, x2, y2]`.
    pub(crate) fn bbox(&self, glyphs: impl IntoIterator<Item = u16>) -> [f32; 4] {
        let bounds = glyphs
            .into_iter()
            .filter_map(|glyph| self.font.outline(GlyphId(glyph)))
            .map(|outline| {
                let (a, b) = (outline.bounds.min, outline.bounds.max);
                [a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y)]
            })
            .reduce(|acc, r| {
                [
                    acc[0].min(r[0]),
                    acc[1].min(r[1]),
                    acc[2].max(r[2]),
                    acc[3].max(r[3]),
                ]
            });
        match bounds {
            Some(b) => b.map(|v| v * self.scale),
            None => [0.0, self.descent(), 1000.0, self.ascent()],
        }
    }

    /// Font program reduced to `glyphs`. Glyph ids are preserved.
    pub(crate) fn subset(&self, glyphs: &[u16]) -> Result<Vec<u8>> {
        let program = subsetter::subset(self.font.as_slice(), self.index, Profile::pdf(glyphs))
            .map_err(|e| FirmasError::Render(format!("could not subset {}: {e}", self.name)))?;
        if program.starts_with(b"OTTO") {
            return Err(FirmasError::Render(format!(
                "{} has CFF outlines; a TrueType font is required",
                self.name
            )));
        }
        Ok(program)
    }
}

/// Regular and bold faces for one document.
#[derive(Debug)]
pub struct SheetFonts {
    regular: EmbeddedFont,
    bold: EmbeddedFont,
}

impl SheetFonts {
    pub fn new(regular: EmbeddedFont, bold: EmbeddedFont) -> Self {
        Self { regular, bold }
    }

    /// Resolve both faces from font files or the system font database.
    pub fn load(config: &FontConfig) -> Result<Self> {
        config.validate()?;
        let mut db = Database::new();
        let regular = match &config.regular {
            Some(path) => EmbeddedFont::from_file(path)?,
            None => {
                db.load_system_fonts();
                debug!("{} system font faces available", db.len());
                query_face(&db, &config.families, Weight::NORMAL)?
            }
        };
        let bold = match (&config.bold, &config.regular) {
            (Some(path), _) | (None, Some(path)) => EmbeddedFont::from_file(path)?,
            (None, None) => query_face(&db, &config.families, Weight::BOLD)?,
        };
        debug!("PDF faces: {} and {}", regular.name(), bold.name());
        Ok(Self { regular, bold })
    }

    pub(crate) fn face(&self, face: Face) -> &EmbeddedFont {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        }
    }
}

/// First configured family with a usable TrueType face at `weight`.
fn query_face(db: &Database, families: &[String], weight: Weight) -> Result<EmbeddedFont> {
    for family in families {
        let wanted = [Family::Name(family.as_str())];
        let query = Query {
            families: &wanted,
            weight,
            ..Query::default()
        };
        let Some(id) = db.query(&query) else {
            continue;
        };
        match load_face(db, id) {
            Ok(font) => return Ok(font),
            Err(e) => warn!("skipping font family {family}: {e}"),
        }
    }
    Err(FirmasError::Render(format!(
        "no TrueType font found among: {}",
        families.join(", ")
    )))
}

fn load_face(db: &Database, id: ID) -> Result<EmbeddedFont> {
    let info = db
        .face(id)
        .ok_or_else(|| FirmasError::Render("font face missing from the database".into()))?;
    let name = info.post_script_name.clone();
    let index = info.index;
    let data = db
        .with_face_data(id, |data, _| data.to_vec())
        .ok_or_else(|| FirmasError::Render(format!("could not read font data of {name}")))?;
    EmbeddedFont::from_data(name, data, index)
}
