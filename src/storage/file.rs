use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde_json::{Map, Value};

use super::Storage;

const STORAGE_FILENAME: &str = "storage.json";

/// Maximum storage file size (1MB); history is capped far below this
const MAX_STORAGE_SIZE: u64 = 1024 * 1024;

/// JSON-object file storage under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage file inside `data_dir`; the directory is created on first write
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(STORAGE_FILENAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let size = fs::metadata(&self.path)
            .with_context(|| format!("Failed to read storage metadata: {}", self.path.display()))?
            .len();
        if size > MAX_STORAGE_SIZE {
            bail!(
                "Storage file too large: {} ({} bytes, max {} bytes)",
                self.path.display(),
                size,
                MAX_STORAGE_SIZE
            );
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file: {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents).context("Failed to parse storage JSON")? {
            Value::Object(map) => Ok(map),
            _ => bail!("Storage file is not a JSON object: {}", self.path.display()),
        }
    }

    /// Current object for a read-modify-write. An unreadable file is moved
    /// aside to `storage.json.bak` and replaced rather than blocking writes.
    fn read_object_for_write(&self) -> Map<String, Value> {
        match self.read_object() {
            Ok(map) => map,
            Err(e) => {
                warn!("Replacing unreadable storage file: {:#}", e);
                let backup = self.path.with_extension("json.bak");
                if let Err(e) = fs::rename(&self.path, &backup) {
                    warn!("Failed to back up storage file to {}: {}", backup.display(), e);
                }
                Map::new()
            }
        }
    }

    /// Write atomically (temp file + rename)
    fn write_object(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let temp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(map).context("Failed to serialize storage")?;
        fs::write(&temp, json).context("Failed to write storage temp file")?;
        fs::rename(&temp, &self.path).context("Failed to rename storage temp file")?;
        debug!("Wrote storage file {}", self.path.display());
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_object()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut map = self.read_object_for_write();
        map.insert(key.to_string(), value);
        self.write_object(&map)
    }
}
