//! Display and break-time policy.

use serde::{Deserialize, Serialize};

/// User-facing display settings shared by every rendering path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// moment.js-style pattern for displayed timestamps.
    pub timestamp_format: String,

    /// moment.js-style pattern used when editing timestamps.
    pub editable_timestamp_format: String,

    /// Separator for CSV export.
    pub csv_delimiter: String,

    /// Break durations into years, months and days instead of total hours.
    pub fine_grained_durations: bool,

    /// Show the newest segments first.
    pub reverse_segment_order: bool,

    /// Render durations as `HH:MM:SS` instead of `1h 2m 3s`.
    pub timestamp_durations: bool,

    /// Allow setting the punch-in/punch-out bracket.
    pub enable_punch_in_out: bool,

    /// Entry names (lower-case) that count as break time.
    pub pause_keywords: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timestamp_format: "YY-MM-DD HH:mm:ss".to_string(),
            editable_timestamp_format: "YYYY-MM-DD HH:mm:ss".to_string(),
            csv_delimiter: ",".to_string(),
            fine_grained_durations: true,
            reverse_segment_order: false,
            timestamp_durations: false,
            enable_punch_in_out: true,
            pause_keywords: ["pause", "break", "lunch", "dinner", "toilet"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Settings {
    /// Replaces empty text settings with their defaults.
    ///
    /// Keywords are trimmed, lower-cased and stripped of empties.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.timestamp_format.is_empty() {
            self.timestamp_format = defaults.timestamp_format;
        }
        if self.editable_timestamp_format.is_empty() {
            self.editable_timestamp_format = defaults.editable_timestamp_format;
        }
        if self.csv_delimiter.is_empty() {
            self.csv_delimiter = defaults.csv_delimiter;
        }
        self.pause_keywords = self
            .pause_keywords
            .iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        self
    }
}
