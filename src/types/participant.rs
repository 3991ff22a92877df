use serde::{Deserialize, Serialize};

/// One roster entry.
///
/// First and last name are kept as separate fields from load to render;
/// both are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub first_name: String,
    pub last_name: String,
}

impl ParticipantRecord {
    /// Build a record, trimming surrounding whitespace from both names.
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        }
    }

    /// Key used for alphabetical ordering (case-insensitive first name).
    pub fn sort_key(&self) -> String {
        self.first_name.to_lowercase()
    }
}
