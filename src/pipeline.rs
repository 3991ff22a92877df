//! End-to-end run: locate roster, load, lay out, render.
//!
//! Stage failures are reported through `tracing` and never abort the
//! process. A roster that cannot be loaded stops the run before any
//! output is written; a failing renderer only loses its own output.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::Config;
use crate::discovery::{default_search_dir, locate_roster};
use crate::error::{FirmasError, Result};
use crate::export::save_xlsx;
use crate::layout::BlockLayout;
use crate::render::{build_sheet, save_html, save_pdf, SheetFonts};
use crate::roster::load_roster;
use crate::types::{DocumentMeta, ParticipantRecord};

/// Which documents a run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSelection {
    pub xlsx: bool,
    pub html: bool,
    pub pdf: bool,
}

impl Default for OutputSelection {
    fn default() -> Self {
        Self {
            xlsx: true,
            html: true,
            pdf: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Config,
    /// Explicit roster path; skips discovery when set.
    pub input: Option<PathBuf>,
    pub meta: DocumentMeta,
    pub outputs: OutputSelection,
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Roster that was loaded; `None` when loading failed.
    pub roster: Option<PathBuf>,
    pub participants: usize,
    pub blocks: usize,
    pub xlsx: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
}

impl RunSummary {
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        [&self.xlsx, &self.html, &self.pdf]
            .into_iter()
            .filter_map(|p| p.as_deref())
    }
}

/// Run the whole pipeline, reporting failures instead of returning them.
pub fn run(options: &RunOptions) -> RunSummary {
    let mut summary = RunSummary::default();

    let (path, participants) = match resolve_roster(options).and_then(|path| {
        let people = load_roster(&path, &options.config.roster.columns())?;
        Ok((path, people))
    }) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("could not load roster: {e}");
            return summary;
        }
    };
    summary.roster = Some(path);
    summary.participants = participants.len();
    if participants.is_empty() {
        warn!("roster has no participants; writing header-only sheets");
    }

    render_outputs(&participants, options, &mut summary);
    summary
}

/// Lay out `participants` (already sorted) and write every selected output.
pub fn render_outputs(
    participants: &[ParticipantRecord],
    options: &RunOptions,
    summary: &mut RunSummary,
) {
    let layout = match BlockLayout::new(participants, &options.config.layout) {
        Ok(layout) => layout,
        Err(e) => {
            error!("invalid layout: {e}");
            return;
        }
    };
    summary.blocks = layout.block_count();
    info!(
        "{} participants in {} blocks of up to {}",
        layout.participant_count(),
        layout.block_count(),
        layout.block_size()
    );

    let output = &options.config.output;
    if let Err(e) = std::fs::create_dir_all(&output.dir) {
        error!(
            "could not create output directory {}: {e}",
            output.dir.display()
        );
        return;
    }

    if options.outputs.xlsx {
        summary.xlsx = write_stage("XLSX", output.xlsx_path(), |path| {
            let sheet = build_sheet(&layout, &options.config.sheet);
            save_xlsx(&sheet, path)
        });
    }
    if options.outputs.html {
        summary.html = write_stage("HTML", output.html_path(), |path| {
            save_html(&layout, &options.meta, path)
        });
    }
    if options.outputs.pdf {
        summary.pdf = write_stage("PDF", output.pdf_path(), |path| {
            let fonts = SheetFonts::load(&options.config.fonts)?;
            save_pdf(&layout, &options.meta, &fonts, path)
        });
    }
}

fn write_stage<F>(label: &str, path: PathBuf, write: F) -> Option<PathBuf>
where
    F: FnOnce(&Path) -> Result<()>,
{
    match write(&path) {
        Ok(()) => {
            info!("{label} written to {}", path.display());
            Some(path)
        }
        Err(e) => {
            error!("could not write {label} to {}: {e}", path.display());
            None
        }
    }
}

fn resolve_roster(options: &RunOptions) -> Result<PathBuf> {
    if let Some(input) = &options.input {
        return Ok(input.clone());
    }
    let dir = options
        .config
        .roster
        .search_dir
        .clone()
        .or_else(default_search_dir)
        .ok_or_else(|| FirmasError::Config("no roster search directory available".into()))?;
    info!("searching {} for a roster export", dir.display());
    locate_roster(&dir)
}
