//! Local persisted state: a JSON key/value file standing in for the
//! browser's localStorage (auth flag, session identifier).

use std::collections::HashMap;
use std::path::PathBuf;

use opera_kb_client::config::home_dir;

/// Key/value store backed by one JSON file. Missing or unreadable files
/// behave like an empty store; writes create the parent directory.
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default state file path: `~/.opera-kb/state.json`.
    pub fn default_path() -> Option<PathBuf> {
        let home = home_dir()?;
        Some(home.join(".opera-kb").join("state.json"))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    pub fn remove(&self, key: &str) -> Result<(), String> {
        let mut map = self.read_map();
        map.remove(key);
        self.write_map(&map)
    }

    fn read_map(&self) -> HashMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }
        let contents = serde_json::to_string_pretty(map).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, contents).map_err(|e| e.to_string())
    }
}
