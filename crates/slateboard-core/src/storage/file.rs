//! File-based storage implementation for native platforms.

use super::{KeyedStore, StoreError, StoreResult};
use std::fs;
use std::path::PathBuf;

/// File-backed store for native platforms.
///
/// Each key becomes one JSON file in the base directory. Keys are sanitized
/// into file names, so `keys` reports the sanitized form; catalog keys are
/// alphanumeric plus hyphens and survive the round trip unchanged.
pub struct FileStore {
    /// Base directory for the entry files.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store over the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StoreError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the default location.
    ///
    /// On Unix: `~/.local/share/slateboard/boards/`
    /// On Windows: `%LOCALAPPDATA%\slateboard\boards\`
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("Could not determine home directory".to_string()))?;

        let path = base.join("slateboard").join("boards");
        Self::new(path)
    }

    /// Get the file path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        // Sanitize the key to be safe for filenames
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl KeyedStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.entry_path(key);
        fs::write(&path, value)
            .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StoreError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StoreError::Io(format!("Failed to read directory: {}", e)))?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            if let Some(name) = entry.path().file_stem() {
                if let Some(name_str) = name.to_str() {
                    // Only include .json files
                    if entry.path().extension().map(|e| e == "json").unwrap_or(false) {
                        keys.push(name_str.to_string());
                    }
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_set_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.set("board-1", "{\"name\":\"Test\"}").unwrap();
        let value = store.get("board-1").unwrap();

        assert_eq!(value.as_deref(), Some("{\"name\":\"Test\"}"));
    }

    #[test]
    fn test_file_store_absent_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        assert!(store.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_file_store_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.set("board-1", "a").unwrap();
        store.set("board-2", "b").unwrap();

        let keys = store.keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"board-1".to_string()));
        assert!(keys.contains(&"board-2".to_string()));
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.set("board-1", "a").unwrap();
        store.remove("board-1").unwrap();
        assert!(store.get("board-1").unwrap().is_none());

        // Removing an absent key is fine.
        store.remove("board-1").unwrap();
    }

    #[test]
    fn test_file_store_sanitizes_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        // Keys with path separators must not escape the base directory.
        store.set("a/b:c", "v").unwrap();
        assert_eq!(store.get("a/b:c").unwrap().as_deref(), Some("v"));
        assert!(dir.path().join("a_b_c.json").exists());
    }
}
