//! Key/value persistence for history and preferences.
//!
//! Backends answer plain request/response calls; callers decide how to degrade
//! when a backend is unavailable.
//!
//! - [`FileStorage`] - one JSON object on disk, written atomically
//! - [`MemoryStorage`] - process-local map (tests, and fallback with no data dir)

mod file;
mod memory;

use anyhow::Result;
pub use file::FileStorage;
pub use memory::MemoryStorage;
use serde_json::Value;

/// Key holding the conversion history list
pub const HISTORY_KEY: &str = "history";
/// Key holding the theme preference string
pub const THEME_KEY: &str = "theme";

pub trait Storage {
    /// Read a value; `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }
}
