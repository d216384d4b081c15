use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;

use super::Storage;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_missing_key() {
        let storage = MemoryStorage::new();
        assert!(storage.get("history").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut storage = MemoryStorage::new();
        storage.set("theme", json!("dark")).unwrap();
        storage.set("theme", json!("light")).unwrap();
        assert_eq!(storage.get("theme").unwrap(), Some(json!("light")));
    }
}
