//! Run configuration loaded from an optional JSON file.
//!
//! Every section falls back to its defaults, so a file only needs the
//! keys it wants to change. Command-line flags are applied on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::csv::{RosterColumns, DEFAULT_FIRST_NAME_COLUMN, DEFAULT_LAST_NAME_COLUMN};
use crate::error::{FirmasError, Result};
use crate::layout::LayoutConfig;
use crate::render::{FontConfig, SheetGeometry};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub roster: RosterConfig,
    pub layout: LayoutConfig,
    pub sheet: SheetGeometry,
    /// Faces embedded in the PDF.
    pub fonts: FontConfig,
    pub output: OutputConfig,
}

/// Where to find the roster and how its columns are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub first_name_column: String,
    pub last_name_column: String,
    /// Directory scanned for roster exports; the Downloads folder when unset.
    pub search_dir: Option<PathBuf>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            first_name_column: DEFAULT_FIRST_NAME_COLUMN.into(),
            last_name_column: DEFAULT_LAST_NAME_COLUMN.into(),
            search_dir: None,
        }
    }
}

impl RosterConfig {
    pub fn columns(&self) -> RosterColumns {
        RosterColumns {
            first_name: self.first_name_column.clone(),
            last_name: self.last_name_column.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub xlsx_name: String,
    pub html_name: String,
    pub pdf_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./result"),
            xlsx_name: "hoja_firmas.xlsx".into(),
            html_name: "hoja_firmas.html".into(),
            pdf_name: "hoja_firmas.pdf".into(),
        }
    }
}

impl OutputConfig {
    pub fn xlsx_path(&self) -> PathBuf {
        self.dir.join(&self.xlsx_name)
    }

    pub fn html_path(&self) -> PathBuf {
        self.dir.join(&self.html_name)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.dir.join(&self.pdf_name)
    }
}

impl Config {
    /// Parse a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.fonts.validate()?;
        if self.roster.first_name_column.trim().is_empty()
            || self.roster.last_name_column.trim().is_empty()
        {
            return Err(FirmasError::Config("roster column names must not be empty".into()));
        }
        let names = [
            &self.output.xlsx_name,
            &self.output.html_name,
            &self.output.pdf_name,
        ];
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(FirmasError::Config("output file names must not be empty".into()));
        }
        Ok(())
    }
}
