use crate::formatting::{ConversionData, strip_timezone_suffix};
use crate::models::{EpochMillis, HistoryEntry, Source};

/// One labelled line of a result or history card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub label: &'static str,
    pub value: String,
    /// Text a copy action puts on the clipboard; `None` when the row has no copy button
    pub copy: Option<String>,
    pub relative: bool,
}

impl ResultRow {
    fn copyable(label: &'static str, value: String) -> Self {
        Self { label, copy: Some(value.clone()), value, relative: false }
    }

    fn epoch_millis(epoch_ms: EpochMillis) -> Self {
        Self::copyable("Epoch (ms)", epoch_ms.to_string())
    }

    fn epoch_seconds(epoch_ms: EpochMillis) -> Self {
        Self::copyable("Epoch (s)", epoch_ms.div_euclid(1000).to_string())
    }

    fn gmt(gmt: &str) -> Self {
        Self::copyable("GMT", gmt.to_string())
    }

    /// Copies the bare timestamp, without the offset suffix
    fn local(local: &str) -> Self {
        Self {
            label: "Local",
            value: local.to_string(),
            copy: Some(strip_timezone_suffix(local).to_string()),
            relative: false,
        }
    }

    fn relative(text: &str) -> Self {
        Self { label: "Relative", value: text.to_string(), copy: None, relative: true }
    }

    /// Epoch, GMT, Local and a relative line (epoch and relative forms, selection overlay)
    pub fn for_instant(epoch_ms: EpochMillis, data: &ConversionData, relative: &str) -> Vec<Self> {
        vec![Self::epoch_millis(epoch_ms), Self::gmt(&data.gmt), Self::local(&data.local), Self::relative(relative)]
    }

    /// Epoch in ms and s plus the relative line (date form)
    pub fn for_date(epoch_ms: EpochMillis, data: &ConversionData) -> Vec<Self> {
        vec![Self::epoch_millis(epoch_ms), Self::epoch_seconds(epoch_ms), Self::relative(&data.relative)]
    }
}

/// Detail lines for a history card
pub fn history_rows(entry: &HistoryEntry) -> Vec<ResultRow> {
    match entry.source {
        Source::Date => vec![ResultRow::epoch_millis(entry.epoch_ms), ResultRow::epoch_seconds(entry.epoch_ms)],
        Source::Epoch | Source::Relative => vec![
            ResultRow::epoch_millis(entry.epoch_ms),
            ResultRow::gmt(&entry.gmt),
            ResultRow::local(&entry.local),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> ConversionData {
        ConversionData {
            gmt: "2023-11-14 22:13:20.000".to_string(),
            local: "2023-11-14 23:13:20.000 (+01:00)".to_string(),
            relative: "1y ago".to_string(),
        }
    }

    #[test]
    fn test_local_row_copies_without_suffix() {
        let rows = ResultRow::for_instant(1_700_000_000_000, &data(), "1y ago");
        let local = rows.iter().find(|r| r.label == "Local").unwrap();
        assert_eq!(local.value, "2023-11-14 23:13:20.000 (+01:00)");
        assert_eq!(local.copy.as_deref(), Some("2023-11-14 23:13:20.000"));
    }

    #[test]
    fn test_relative_row_has_no_copy() {
        let rows = ResultRow::for_instant(1_700_000_000_000, &data(), "1y ago");
        let relative = rows.last().unwrap();
        assert!(relative.relative);
        assert!(relative.copy.is_none());
    }

    #[test]
    fn test_epoch_seconds_floor_for_negative() {
        let rows = ResultRow::for_date(-1, &data());
        assert_eq!(rows[1].value, "-1");
        let rows = ResultRow::for_date(1_700_000_000_999, &data());
        assert_eq!(rows[1].value, "1700000000");
    }

    #[test]
    fn test_history_rows_by_source() {
        let mut entry = HistoryEntry {
            source: Source::Date,
            input: "2023-11-14 22:13:20.000 GMT".to_string(),
            display: None,
            epoch_ms: 1_700_000_000_000,
            gmt: data().gmt,
            local: data().local,
            relative: None,
            converted_at: String::new(),
        };
        let labels: Vec<_> = history_rows(&entry).iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Epoch (ms)", "Epoch (s)"]);

        entry.source = Source::Relative;
        let labels: Vec<_> = history_rows(&entry).iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Epoch (ms)", "GMT", "Local"]);
    }
}
