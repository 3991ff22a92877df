//! Loading and ordering a roster file.

use std::path::Path;

use tracing::{debug, info};

use crate::csv::{parse_roster, RosterColumns};
use crate::error::Result;
use crate::types::ParticipantRecord;

/// Sort case-insensitively by first name.
///
/// The sort is stable: participants sharing a first name keep file order.
pub fn sort_participants(participants: &mut [ParticipantRecord]) {
    participants.sort_by_cached_key(ParticipantRecord::sort_key);
}

/// Read, parse and sort the roster at `path`.
pub fn load_roster(path: &Path, columns: &RosterColumns) -> Result<Vec<ParticipantRecord>> {
    let data = std::fs::read(path)?;
    debug!("read {} bytes from {}", data.len(), path.display());

    let mut participants = parse_roster(&data, columns)?;
    sort_participants(&mut participants);

    info!(
        "loaded {} participants from {}",
        participants.len(),
        path.file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
    );
    Ok(participants)
}
