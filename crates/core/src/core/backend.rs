//! Key/value string storage behind the score manager.
//!
//! Mirrors a browser's `localStorage`: `read` of a missing key is `None`,
//! `write` replaces the whole value.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub trait ScoreBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl ScoreBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert(key, value);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`. Writes go to a temp file that
/// is then renamed over the target, so readers never see a torn value.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ScoreBackend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_replaces_values() {
        let mut b = MemoryBackend::new();
        assert_eq!(b.read("k"), None);
        b.write("k", "1").unwrap();
        b.write("k", "2").unwrap();
        assert_eq!(b.read("k").as_deref(), Some("2"));
    }

    #[test]
    fn file_backend_round_trips_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = FileBackend::new(dir.path().join("nested"));
        assert_eq!(b.read("gameScores"), None);

        b.write("gameScores", "{\"a\":[]}").unwrap();
        assert_eq!(b.read("gameScores").as_deref(), Some("{\"a\":[]}"));
        assert!(b.path_for("gameScores").exists());
        assert!(!b.path_for("gameScores").with_extension("json.tmp").exists());
    }
}
