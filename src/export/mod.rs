//! XLSX export pipeline.
//!
//! Serialises a [`Sheet`] into a fresh single-sheet workbook: content
//! types, relationships, workbook, deduplicated styles and the worksheet.

mod package;
mod sheet_writer;
mod styles_writer;

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::types::Sheet;

/// Serialise `sheet` to XLSX bytes.
pub fn write_xlsx(sheet: &Sheet) -> Result<Vec<u8>> {
    let bytes = package::build_package(sheet)?;
    debug!(
        "packaged sheet {:?}: {} cells, {} bytes",
        sheet.name,
        sheet.cells.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Serialise `sheet` and write it to `path`, replacing any existing file.
pub fn save_xlsx(sheet: &Sheet, path: &Path) -> Result<()> {
    let bytes = write_xlsx(sheet)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
