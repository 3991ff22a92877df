//! Data types shared by the loader, layout engine and renderers.

mod cell;
mod meta;
mod participant;
mod style;
mod workbook;

pub use cell::*;
pub use meta::*;
pub use participant::*;
pub use style::*;
pub use workbook::*;
