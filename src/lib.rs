//! firmas - attendance sign sheets from a course roster
//!
//! Turns a `courseid_XXX_participants.csv` export into printable sign sheets:
//! - Roster discovery by file name, or an explicit path
//! - Alphabetical ordering by first name
//! - Blocks of 8 rows, two blocks per visual row
//! - XLSX (sheet `Firmas`), HTML and paginated PDF output
//!
//! # Usage
//!
//! ```no_run
//! use firmas::{layout::{BlockLayout, LayoutConfig}, render, roster, csv::RosterColumns};
//!
//! # fn main() -> firmas::error::Result<()> {
//! let people = roster::load_roster("roster.csv".as_ref(), &RosterColumns::default())?;
//! let layout = BlockLayout::new(&people, &LayoutConfig::default())?;
//! let sheet = render::build_sheet(&layout, &render::SheetGeometry::default());
//! let xlsx = firmas::export::write_xlsx(&sheet)?;
//! # let _ = xlsx;
//! # Ok(())
//! # }
//! ```

// Input
pub mod csv;
pub mod discovery;
pub mod roster;

// Model and layout
pub mod cell_ref;
pub mod error;
pub mod layout;
pub mod types;

// Output
pub mod export;
pub mod render;

// Wiring
pub mod config;
pub mod pipeline;

pub use error::{FirmasError, Result};
pub use types::*;
