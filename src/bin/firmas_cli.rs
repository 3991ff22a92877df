//! CLI for firmas - builds attendance sign sheets from a roster export
//!
//! Usage:
//!   firmas_cli                                  # Discover roster in Downloads
//!   firmas_cli "Física I" T1 3                  # Subject, group and week
//!   firmas_cli --input roster.csv --no-prompt   # Explicit roster, default day labels

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dialoguer::Input;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use firmas::config::Config;
use firmas::layout::LayoutMode;
use firmas::pipeline::{self, OutputSelection, RunOptions};
use firmas::types::{DayLabels, DocumentMeta, Week, DEFAULT_FIRST_DAY, DEFAULT_SECOND_DAY};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    /// Blocks side by side, `--blocks-per-row` wide
    Grid,
    /// One block per row
    Stacked,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Grid => LayoutMode::Grid,
            LayoutArg::Stacked => LayoutMode::Stacked,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "firmas_cli")]
#[command(about = "Generate attendance sign sheets (XLSX, HTML, PDF) from a roster CSV.")]
struct CommandLine {
    /// Subject shown in the document banner
    subject: Option<String>,
    /// Group shown in the document banner
    group: Option<String>,
    /// Week number (1-15)
    week: Option<String>,

    /// Roster CSV to load instead of searching for one
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Directory searched for courseid_XXX_participants.csv
    #[arg(long)]
    search_dir: Option<PathBuf>,
    /// Directory the documents are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Block arrangement in the spreadsheet; HTML and PDF always pair blocks
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// Blocks side by side in the spreadsheet grid
    #[arg(long)]
    blocks_per_row: Option<usize>,
    #[arg(long)]
    block_size: Option<usize>,

    /// TrueType font embedded in the PDF instead of a system sans-serif
    #[arg(long)]
    font: Option<PathBuf>,
    /// TrueType font for PDF headers; defaults to --font
    #[arg(long, requires = "font")]
    bold_font: Option<PathBuf>,

    /// Label of the first signature column
    #[arg(long)]
    day1: Option<String>,
    /// Label of the second signature column
    #[arg(long)]
    day2: Option<String>,
    /// Never prompt for day labels
    #[arg(long)]
    no_prompt: bool,

    #[arg(long)]
    no_xlsx: bool,
    #[arg(long)]
    no_html: bool,
    #[arg(long)]
    no_pdf: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl CommandLine {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(dir) = &self.search_dir {
            config.roster.search_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(layout) = self.layout {
            config.layout.mode = layout.into();
        }
        if let Some(n) = self.blocks_per_row {
            config.layout.blocks_per_row = n;
        }
        if let Some(n) = self.block_size {
            config.layout.block_size = n;
        }
        if let Some(font) = &self.font {
            config.fonts.regular = Some(font.clone());
            config.fonts.bold = self.bold_font.clone();
        }
        config.validate().context("invalid layout or font options")?;
        Ok(config)
    }

    fn document_meta(&self) -> DocumentMeta {
        let week = self.week.as_deref().filter(|w| !w.trim().is_empty());
        let week = week.and_then(|raw| {
            let parsed = Week::parse(raw);
            if parsed.is_none() {
                warn!(
                    "ignoring week {raw:?}: expected a number from {} to {}",
                    Week::MIN,
                    Week::MAX
                );
            }
            parsed
        });

        DocumentMeta::default()
            .with_subject(self.subject.as_deref())
            .with_group(self.group.as_deref())
            .with_week(week)
            .with_day_labels(self.day_labels())
    }

    fn day_labels(&self) -> DayLabels {
        let interactive = !self.no_prompt && std::io::stdin().is_terminal();
        let first = self
            .day1
            .clone()
            .or_else(|| interactive.then(|| prompt_day("Etiqueta del primer día", DEFAULT_FIRST_DAY)));
        let second = self
            .day2
            .clone()
            .or_else(|| interactive.then(|| prompt_day("Etiqueta del segundo día", DEFAULT_SECOND_DAY)));
        DayLabels::from_inputs(first.as_deref(), second.as_deref())
    }

    fn outputs(&self) -> OutputSelection {
        OutputSelection {
            xlsx: !self.no_xlsx,
            html: !self.no_html,
            pdf: !self.no_pdf,
        }
    }
}

fn prompt_day(prompt: &str, default: &str) -> String {
    Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .allow_empty(true)
        .interact_text()
        .unwrap_or_else(|e| {
            warn!("prompt failed ({e}); using {default:?}");
            default.to_string()
        })
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "firmas=debug" } else { "firmas=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse();
    init_logging(cli.verbose);

    let options = RunOptions {
        config: cli.load_config()?,
        input: cli.input.clone(),
        meta: cli.document_meta(),
        outputs: cli.outputs(),
    };

    let summary = pipeline::run(&options);
    if summary.roster.is_some() {
        info!(
            "processed {} participants into {} blocks",
            summary.participants, summary.blocks
        );
    }
    Ok(())
}
