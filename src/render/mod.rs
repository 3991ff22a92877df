//! Renderers for the laid-out roster.
//!
//! Each renderer consumes the same [`BlockLayout`](crate::layout::BlockLayout):
//! - `spreadsheet`: the `Firmas` worksheet model, serialised by [`crate::export`]
//! - `html`: printable HTML document (tera template)
//! - `pdf`: paginated A4 PDF with embedded TrueType faces

pub mod html;
pub mod pdf;
pub mod spreadsheet;

pub use html::{render_html, save_html};
pub use pdf::{render_pdf, save_pdf, EmbeddedFont, FontConfig, SheetFonts};
pub use spreadsheet::{build_sheet, SheetGeometry};
