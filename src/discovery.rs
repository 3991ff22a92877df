//! Locating roster exports by file name.
//!
//! Course platforms export rosters as `courseid_<3 digits>_participants.csv`.
//! Matching is kept separate from loading so callers can pass an explicit
//! path and skip discovery entirely.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{FirmasError, Result};

/// File name pattern of a roster export.
pub const ROSTER_FILE_PATTERN: &str = r"^courseid_\d{3}_participants\.csv$";

fn roster_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(ROSTER_FILE_PATTERN).ok())
        .as_ref()
}

/// Whether `name` (a bare file name, not a path) looks like a roster export.
pub fn is_roster_file_name(name: &str) -> bool {
    roster_pattern().is_some_and(|re| re.is_match(name))
}

/// Scan `dir` (non-recursively) for roster exports, following symlinks.
///
/// Returns the lexicographically first match, or `None` when the directory
/// holds no roster.
pub fn find_roster_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks; a dangling link is skipped.
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_roster_file_name(name) {
            matches.push(entry.path());
        } else {
            debug!("skipping {name}: not a roster export");
        }
    }
    matches.sort();
    Ok(matches.into_iter().next())
}

/// Like [`find_roster_file`], but a missing roster is an error.
pub fn locate_roster(dir: &Path) -> Result<PathBuf> {
    find_roster_file(dir)?.ok_or_else(|| FirmasError::RosterNotFound {
        dir: dir.to_path_buf(),
    })
}

/// The user's Downloads directory, where browsers drop roster exports.
pub fn default_search_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}
