//! File-backed record store: one JSON object per store file mapping keys to
//! string values. Writes go through a temp file and rename so a crash never
//! leaves a half-written store behind.

use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::traits::{RecordStore, StoreError};

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open (or create the parent directory for) a store at
    /// `<base_dir>/store.json`.
    pub fn new(base_dir: &Path) -> Result<Self, StoreError> {
        if !base_dir.exists() {
            fs::create_dir_all(base_dir)?;
            info!("Created store directory: {:?}", base_dir);
        }
        Ok(Self {
            path: base_dir.join("store.json"),
        })
    }

    fn read_map(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            debug!("Store file {:?} doesn't exist yet", self.path);
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(map)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, raw)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_through_the_filesystem() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        assert!(store.read("a").unwrap().is_none());
        store.write("a", "{\"children\":[]}").unwrap();
        store.write("b", "unrelated").unwrap();

        // Reopen to prove the value survived.
        let reopened = JsonFileStore::new(dir.path()).unwrap();
        assert_eq!(reopened.read("a").unwrap().as_deref(), Some("{\"children\":[]}"));
        assert_eq!(reopened.read("b").unwrap().as_deref(), Some("unrelated"));
    }

    #[test]
    fn corrupt_store_file_surfaces_a_typed_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        fs::write(dir.path().join("store.json"), "{not valid").unwrap();

        assert!(matches!(store.read("a"), Err(StoreError::Malformed(_))));
    }
}
