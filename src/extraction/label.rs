//! Date labels: signed four-digit years or the `Unknown` sentinel.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `[+-]` followed by exactly four ASCII digits. `\d` would admit non-ASCII digits.
static YEAR_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-][0-9]{4}$").expect("year label pattern is valid"));

/// Returns true when `label` is a canonical signed four-digit year such as `+1532` or `-0053`.
pub fn is_valid_date_label(label: &str) -> bool {
    YEAR_LABEL.is_match(label)
}

/// A year label as answered by the model.
///
/// The wrapped string is kept verbatim: an end label is stored even when it
/// does not have the canonical shape. Use [`DateLabel::is_year`] to check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateLabel(String);

impl DateLabel {
    /// Sentinel text for "could not determine"
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn is_year(&self) -> bool {
        is_valid_date_label(&self.0)
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The model's structured answer.
///
/// No ordering is enforced between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(rename = "start_date")]
    pub start: DateLabel,
    #[serde(rename = "end_date")]
    pub end: DateLabel,
}

impl DateRange {
    pub fn new(start: DateLabel, end: DateLabel) -> Self {
        Self { start, end }
    }

    /// The `{"Unknown", "Unknown"}` sentinel pair
    pub fn unknown() -> Self {
        Self::new(DateLabel::unknown(), DateLabel::unknown())
    }
}
