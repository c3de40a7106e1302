//! Durable key/value storage for workspace-scoped state.
//!
//! Each key holds one JSON text blob. [`FileStorage`] keeps one file per key
//! under the workspace store directory; [`MemoryStorage`] keeps everything in
//! process and can be switched into a failing mode.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::CacheError;

pub trait Storage: Send {
    /// Read the text stored under `key`, `None` when nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>, CacheError>;
    /// Replace the text stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io { path: self.dir.clone(), source })?;
        // Write-then-rename so a crash never leaves a truncated cache behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|source| CacheError::Io { path: tmp.clone(), source })?;
        fs::rename(&tmp, &path).map_err(|source| CacheError::Io { path: path.clone(), source })
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    failing: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose reads and writes all fail, as if the backing store were gone.
    pub fn failing() -> Self {
        Self { entries: HashMap::new(), failing: true }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn unavailable(key: &str) -> CacheError {
        CacheError::Io { path: PathBuf::from(key), source: io::Error::other("storage unavailable") }
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.failing {
            return Err(Self::unavailable(key));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        if self.failing {
            return Err(Self::unavailable(key));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("nothing").unwrap().is_none());
    }

    #[test]
    fn file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        storage.write("overrides", "[]").unwrap();
        assert_eq!(storage.read("overrides").unwrap().as_deref(), Some("[]"));
        assert!(storage.path_for("overrides").exists());
        assert!(!storage.path_for("overrides").with_extension("json.tmp").exists());
    }

    #[test]
    fn file_storage_write_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.write("k", "first").unwrap();
        storage.write("k", "second").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn file_storage_unreadable_key_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        // A directory where the file should be cannot be read as text
        fs::create_dir_all(storage.path_for("k")).unwrap();
        assert!(matches!(storage.read("k"), Err(CacheError::Io { .. })));
    }

    #[test]
    fn memory_storage_failing_mode() {
        let mut storage = MemoryStorage::failing();
        assert!(storage.read("k").is_err());
        assert!(storage.write("k", "v").is_err());
        storage.set_failing(false);
        storage.write("k", "v").unwrap();
        assert_eq!(storage.get("k"), Some("v"));
    }
}
