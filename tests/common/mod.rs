//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a temporary data directory holding `storage.json`
pub struct DataDirBuilder {
    temp_dir: TempDir,
}

impl DataDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn storage_path(&self) -> PathBuf {
        self.temp_dir.path().join("storage.json")
    }

    /// Write raw storage file content
    pub fn with_storage(self, content: &str) -> Self {
        fs::write(self.storage_path(), content).expect("Failed to write storage.json");
        self
    }

    /// Store history records (already in persisted JSON shape)
    pub fn with_history_entries(self, entries: &[HistoryEntryBuilder]) -> Self {
        let history: Vec<Value> = entries.iter().map(HistoryEntryBuilder::to_json).collect();
        self.with_storage(&json!({ "history": history }).to_string())
    }

    /// Parsed storage file, `Value::Null` when it doesn't exist
    pub fn read_storage(&self) -> Value {
        match fs::read_to_string(self.storage_path()) {
            Ok(content) => serde_json::from_str(&content).expect("storage.json should be valid JSON"),
            Err(_) => Value::Null,
        }
    }

    pub fn history_len(&self) -> usize {
        self.read_storage()["history"].as_array().map_or(0, Vec::len)
    }

    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

/// Builder for persisted history records
pub struct HistoryEntryBuilder {
    source: String,
    input: String,
    epoch_ms: i64,
}

impl HistoryEntryBuilder {
    pub fn epoch(input: &str, epoch_ms: i64) -> Self {
        Self { source: "epoch".to_string(), input: input.to_string(), epoch_ms }
    }

    pub fn date(input: &str, epoch_ms: i64) -> Self {
        Self { source: "date".to_string(), input: input.to_string(), epoch_ms }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "source": self.source,
            "input": self.input,
            "epochMs": self.epoch_ms,
            "gmt": "2023-11-14 22:13:20.000",
            "local": "2023-11-14 22:13:20.000 (+00:00)",
            "relative": "1y ago",
            "convertedAt": "2024-11-14T09:30:00.000Z"
        })
    }
}

/// The CLI binary pointed at `data_dir`, in UTC, with logging left at defaults
pub fn epoch_buddy(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_epoch-buddy"));
    cmd.env("EPOCH_BUDDY_DATA_DIR", data_dir).env("TZ", "UTC0").env_remove("RUST_LOG");
    cmd
}
