use serde::{Deserialize, Serialize};

use super::EpochMillis;

/// Which conversion form produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Epoch,
    Date,
    Relative,
}

/// A completed conversion, persisted newest-first in the history list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub source: Source,
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(rename = "epochMs")]
    pub epoch_ms: EpochMillis,
    #[serde(default)]
    pub gmt: String,
    #[serde(default)]
    pub local: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
    #[serde(rename = "convertedAt", default)]
    pub converted_at: String,
}

impl HistoryEntry {
    /// Headline shown for the entry: display label, then input, then the raw epoch
    pub fn headline(&self) -> String {
        match (&self.display, self.input.is_empty()) {
            (Some(display), _) if !display.is_empty() => display.clone(),
            (_, false) => self.input.clone(),
            _ => self.epoch_ms.to_string(),
        }
    }
}
