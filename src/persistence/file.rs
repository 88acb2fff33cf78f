//! JSON-file backend
//!
//! The whole store is one JSON object. Flushing writes a sibling `.tmp` file
//! and renames it over the real one so a crash never leaves half a file.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::KeyValueStore;
use crate::error::StoreError;

const APP_DIR: &str = "skyward-dash";
const FILE_NAME: &str = "preferences.json";

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
    dirty: bool,
}

impl FileStore {
    /// Per-user location, falling back to the working directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR).join(FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(FILE_NAME))
    }

    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match Self::read_values(&path) {
            Ok(Some(values)) => {
                log::info!("Loaded {} preferences from {}", values.len(), path.display());
                values
            }
            Ok(None) => {
                log::info!("No preferences at {}, using defaults", path.display());
                Map::new()
            }
            Err(e) => {
                log::warn!("Ignoring preferences at {}: {e}", path.display());
                Map::new()
            }
        };
        Self {
            path,
            values,
            dirty: false,
        }
    }

    fn read_values(path: &Path) -> Result<Option<Map<String, Value>>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        let values: Map<String, Value> = serde_json::from_str(&json)?;
        Ok(Some(values))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are writes not yet flushed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        log::debug!("Preferences written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "skyward-dash-test-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join(FILE_NAME)
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let path = scratch_path("missing");
        let store = FileStore::open(&path);
        assert_eq!(store.get_int("highScore"), None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_flush_then_reopen() {
        let path = scratch_path("reopen");
        let mut store = FileStore::open(&path);
        store.set_int("highScore", 4200);
        store.set_bool("fullscreen", true);
        assert!(store.is_dirty());
        store.flush().unwrap();
        assert!(!store.is_dirty());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_int("highScore"), Some(4200));
        assert_eq!(reopened.get_bool("fullscreen"), Some(true));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_unflushed_writes_are_not_durable() {
        let path = scratch_path("unflushed");
        let mut store = FileStore::open(&path);
        store.set_int("highScore", 10);
        drop(store);
        assert_eq!(FileStore::open(&path).get_int("highScore"), None);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json {").unwrap();
        let store = FileStore::open(&path);
        assert_eq!(store.get_int("highScore"), None);
    }

    #[test]
    fn test_default_path_names_app() {
        let path = FileStore::default_path();
        assert!(path.ends_with(FILE_NAME));
    }
}
