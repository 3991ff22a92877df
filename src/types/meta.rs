use serde::{Deserialize, Serialize};

/// Default label for the first signature sub-column.
pub const DEFAULT_FIRST_DAY: &str = "primera";
/// Default label for the second signature sub-column.
pub const DEFAULT_SECOND_DAY: &str = "segunda";

/// Teaching week shown in the document banner (1–15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Week(u8);

impl Week {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 15;

    /// Returns `None` when `n` is outside `1..=15`.
    pub fn new(n: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&n).then_some(Self(n))
    }

    /// Parse user input. Anything that is not a plain integer in range is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse::<u8>().ok().and_then(Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Week {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n).ok_or_else(|| format!("week {n} outside {}..={}", Self::MIN, Self::MAX))
    }
}

impl From<Week> for u8 {
    fn from(w: Week) -> Self {
        w.0
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Labels printed in the two signature sub-columns of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLabels {
    pub first: String,
    pub second: String,
}

impl Default for DayLabels {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST_DAY.to_string(),
            second: DEFAULT_SECOND_DAY.to_string(),
        }
    }
}

impl DayLabels {
    /// Blank or missing labels fall back to the defaults.
    pub fn from_inputs(first: Option<&str>, second: Option<&str>) -> Self {
        Self {
            first: non_blank(first).unwrap_or_else(|| DEFAULT_FIRST_DAY.to_string()),
            second: non_blank(second).unwrap_or_else(|| DEFAULT_SECOND_DAY.to_string()),
        }
    }
}

/// Banner metadata for the printable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<Week>,
    pub day_labels: DayLabels,
}

impl DocumentMeta {
    /// Set the subject; blank input leaves it empty.
    #[must_use]
    pub fn with_subject(mut self, subject: Option<&str>) -> Self {
        self.subject = non_blank(subject);
        self
    }

    /// Set the group; blank input leaves it empty.
    #[must_use]
    pub fn with_group(mut self, group: Option<&str>) -> Self {
        self.group = non_blank(group);
        self
    }

    #[must_use]
    pub fn with_week(mut self, week: Option<Week>) -> Self {
        self.week = week;
        self
    }

    #[must_use]
    pub fn with_day_labels(mut self, labels: DayLabels) -> Self {
        self.day_labels = labels;
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
