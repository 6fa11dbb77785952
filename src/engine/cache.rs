//! Pluggable cache for definitions read from files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::EngineError;

/// Stores parsed definition sources so they are not read again.
pub trait DefinitionCache: Send + Sync {
    fn fetch(&self, key: &str) -> Result<Option<Map<String, Value>>, EngineError>;

    fn save(&self, key: &str, values: &Map<String, Value>) -> Result<(), EngineError>;
}

/// Process-local cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Map<String, Value>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DefinitionCache for MemoryCache {
    fn fetch(&self, key: &str) -> Result<Option<Map<String, Value>>, EngineError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, values: &Map<String, Value>) -> Result<(), EngineError> {
        self.entries.write().insert(key.to_string(), values.clone());
        Ok(())
    }
}

/// One JSON file per entry under the compilation directory.
pub struct FileCache {
    directory: PathBuf,
}

impl FileCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Alphanumerics are kept; every other byte becomes `_xx` (hex), so distinct
    /// keys never share a file.
    fn entry_path(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("_{byte:02x}"));
            }
        }
        self.directory.join(format!("{file_name}.json"))
    }
}

impl DefinitionCache for FileCache {
    fn fetch(&self, key: &str) -> Result<Option<Map<String, Value>>, EngineError> {
        let path = self.entry_path(key);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| EngineError::Cache(format!("{}: {e}", path.display())))?;
        let values = serde_json::from_str(&raw)
            .map_err(|e| EngineError::Cache(format!("{}: {e}", path.display())))?;
        Ok(Some(values))
    }

    fn save(&self, key: &str, values: &Map<String, Value>) -> Result<(), EngineError> {
        let path = self.entry_path(key);
        let raw = serde_json::to_string_pretty(values)
            .map_err(|e| EngineError::Cache(format!("{key}: {e}")))?;
        fs::write(&path, raw)
            .map_err(|e| EngineError::Cache(format!("{}: {e}", path.display())))
    }
}
