//! HTML rendering of the sign sheet with tera.
//!
//! The document is meant for printing: an A4 `@page` rule, a banner with
//! the session details and the blocks two by two.

use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;
use crate::layout::BlockLayout;
use crate::types::{DocumentMeta, ParticipantRecord};

const TEMPLATE_NAME: &str = "sign_sheet.html";
const TEMPLATE: &str = include_str!("templates/sign_sheet.html");

#[derive(Debug, Serialize)]
struct SheetView<'a> {
    subject: Option<&'a str>,
    group: Option<&'a str>,
    week: Option<u8>,
    day1: &'a str,
    day2: &'a str,
    rows: Vec<Vec<&'a [ParticipantRecord]>>,
}

impl<'a> SheetView<'a> {
    fn new(layout: &BlockLayout<'a>, meta: &'a DocumentMeta) -> Self {
        Self {
            subject: meta.subject.as_deref(),
            group: meta.group.as_deref(),
            week: meta.week.map(|w| w.get()),
            day1: &meta.day_labels.first,
            day2: &meta.day_labels.second,
            rows: layout
                .document_rows()
                .map(|row| row.iter().map(|block| block.participants).collect())
                .collect(),
        }
    }
}

/// Escape text for HTML element content.
///
/// Angle brackets are always escaped. An ampersand is escaped only when
/// it could start a character reference, so "A & B" stays readable in
/// the source.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => {
                let starts_reference = chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '#');
                out.push_str(if starts_reference { "&amp;" } else { "&" });
            }
            _ => out.push(c),
        }
    }
    out
}

fn sign_sheet_tera() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
    tera.autoescape_on(vec![".html"]);
    tera.set_escape_fn(escape_text);
    Ok(tera)
}

/// Render the printable sign sheet as an HTML document.
pub fn render_html(layout: &BlockLayout<'_>, meta: &DocumentMeta) -> Result<String> {
    let tera = sign_sheet_tera()?;
    let context = Context::from_serialize(SheetView::new(layout, meta))?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// Render and write the HTML document to `path`.
pub fn save_html(layout: &BlockLayout<'_>, meta: &DocumentMeta, path: &Path) -> Result<()> {
    let html = render_html(layout, meta)?;
    std::fs::write(path, html)?;
    Ok(())
}
