//! Structured error types for firmas.
//!
//! Every stage returns these; the pipeline decides which ones are reported
//! and which ones stop the run.

use std::path::PathBuf;

/// All errors that can occur while loading a roster or rendering sign sheets.
#[derive(Debug, thiserror::Error)]
pub enum FirmasError {
    /// Malformed CSV input.
    #[error("CSV parsing: {0}")]
    Csv(#[from] ::csv::Error),

    /// ZIP archive error while packaging the XLSX.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// HTML template error.
    #[error("Template: {0}")]
    Template(#[from] tera::Error),

    /// Config file could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The roster lacks one of the required header columns.
    #[error("Missing required columns {expected:?} (found {found:?})")]
    MissingColumns {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// No file matching the roster naming pattern was found.
    #[error("No roster matching courseid_XXX_participants.csv in {}", dir.display())]
    RosterNotFound { dir: PathBuf },

    /// Invalid layout or sheet configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Document rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FirmasError>;

impl From<String> for FirmasError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for FirmasError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
