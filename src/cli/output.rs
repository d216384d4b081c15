//! Plain-text rendering of conversions and history for stdout.

use chrono::TimeZone;

use crate::conversion::{ResultRow, history_rows};
use crate::formatting::format_time_only_in;
use crate::models::{EpochMillis, HistoryEntry};

/// `Label: value` per row
pub fn format_rows(rows: &[ResultRow]) -> String {
    rows.iter().map(|row| format!("{}: {}", row.label, row.value)).collect::<Vec<_>>().join("\n")
}

/// History list, newest first, with the local time each conversion happened
pub fn format_history<Tz: TimeZone>(entries: &[HistoryEntry], tz: &Tz) -> String {
    if entries.is_empty() {
        return "No conversions yet.".to_string();
    }

    let noun = if entries.len() == 1 { "item" } else { "items" };
    let mut lines = vec![format!("{} {}", entries.len(), noun)];
    for entry in entries {
        lines.push(String::new());
        lines.push(format!("{}  {}", format_time_only_in(Some(entry.converted_at.as_str()), tz), entry.headline()));
        for row in history_rows(entry) {
            lines.push(format!("  {}: {}", row.label, row.value));
        }
    }
    lines.join("\n")
}

pub fn format_now(now_ms: EpochMillis) -> String {
    format!("Epoch (s): {}\nEpoch (ms): {}", now_ms.div_euclid(1000), now_ms)
}
