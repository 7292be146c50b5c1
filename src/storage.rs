// Key-value storage backends

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Durable string storage addressed by key
///
/// The task store reads its key once when opened and rewrites the whole
/// value after every mutation.
pub trait KeyValueStore {
    /// Stored value for `key`, or `None` if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open or create a file store rooted at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create data directory")?;
        debug!(path = ?base_path, "Opened file store");
        Ok(Self { base_path })
    }

    /// Get the base path of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        debug!(key, bytes = value.len(), "Read value");
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        let lock_path = self.base_path.join(format!("{}.lock", key));
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .context("Failed to open lock file")?;

        // Held until `lock` is dropped
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let tmp_path = self.base_path.join(format!("{}.json.tmp", key));
        let mut tmp = File::create(&tmp_path).context("Failed to create temporary file")?;
        tmp.write_all(value.as_bytes())?;
        tmp.sync_all()?; // Ensure data is flushed to disk

        let path = self.path_for(key);
        fs::rename(&tmp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!(key, bytes = value.len(), "Wrote value");
        Ok(())
    }
}

/// Volatile store, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Keys double as file stems, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("data");

        let store = FileStore::open(&path).unwrap();
        assert!(path.is_dir());
        assert_eq!(store.base_path(), path.as_path());
    }

    #[test]
    fn test_file_store_get_missing() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_then_get() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();

        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));

        store.set("tasks", "[1]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1]"));

        let content = fs::read_to_string(temp.path().join("tasks.json")).unwrap();
        assert_eq!(content, "[1]");
        assert!(!temp.path().join("tasks.json.tmp").exists());
    }

    #[test]
    fn test_file_store_keys_are_separate() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();

        store.set("tasks", "a").unwrap();
        store.set("archive", "b").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("archive").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("tasks").unwrap(), None);

        store.set("tasks", "[]").unwrap();
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_validate_key() {
        // Valid
        assert!(validate_key("tasks").is_ok());
        assert!(validate_key("my-tasks_2").is_ok());

        // Invalid
        assert!(validate_key("").is_err());
        assert!(validate_key("../tasks").is_err());
        assert!(validate_key("a b").is_err());
        assert!(validate_key(&"a".repeat(65)).is_err());
    }
}
