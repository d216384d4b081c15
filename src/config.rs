//! Runtime configuration: where state lives and how loud logging is.
//!
//! The data directory resolves as `--data-dir` flag, then the
//! `EPOCH_BUDDY_DATA_DIR` environment variable (both handled by clap), then the
//! platform data directory. With none available, state is kept in memory for
//! the life of the process.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::history::HistoryStore;
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::theme::ThemeStore;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "EPOCH_BUDDY_DATA_DIR";

const APP_DIR_NAME: &str = "epoch-buddy";

/// Platform data directory for this app (`~/.local/share/epoch-buddy` on Linux)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    /// Count of `-v` flags
    pub verbosity: u8,
}

impl Config {
    /// `data_dir` is the flag/env value; `None` falls back to the platform directory
    pub fn new(data_dir: Option<PathBuf>, verbosity: u8) -> Self {
        Self { data_dir: data_dir.or_else(default_data_dir), verbosity }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    fn open_storage(&self) -> Box<dyn Storage> {
        match &self.data_dir {
            Some(dir) => Box::new(FileStorage::new(dir)),
            None => Box::new(MemoryStorage::new()),
        }
    }

    /// History and theme stores over the configured backend
    pub fn open_stores(&self) -> (HistoryStore<Box<dyn Storage>>, ThemeStore<Box<dyn Storage>>) {
        match &self.data_dir {
            Some(dir) => debug!("Using data directory {}", dir.display()),
            None => warn!("No data directory available; history and theme will not be saved"),
        }
        (HistoryStore::new(self.open_storage()), ThemeStore::new(self.open_storage()))
    }
}
