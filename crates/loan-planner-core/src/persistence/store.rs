//! Key/value storage for persisted planner state.
//!
//! Two operations, no versioning: the last write for a key wins.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::LoanPlannerError;
use crate::LoanPlannerResult;

/// Minimal fetch/store contract for string values keyed by name.
pub trait KeyValueStore {
    /// Stored value for `key`, or `None` if nothing has been written.
    fn fetch(&self, key: &str) -> LoanPlannerResult<Option<String>>;

    /// Replace the value for `key`.
    fn store(&mut self, key: &str, value: &str) -> LoanPlannerResult<()>;
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn fetch(&self, key: &str) -> LoanPlannerResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> LoanPlannerResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Directory-backed
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// The root directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> LoanPlannerResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(LoanPlannerError::InvalidInput {
                field: "key".into(),
                reason: format!("'{}' is not a valid storage key", key),
            });
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn fetch(&self, key: &str) -> LoanPlannerResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoanPlannerError::StorageError(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    fn store(&mut self, key: &str, value: &str) -> LoanPlannerResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        // Write-then-rename so readers never see a half-written blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        log::debug!("stored {} bytes at {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_last_write_wins() {
        let mut store = MemoryStore::new();
        assert_eq!(store.fetch("plan").unwrap(), None);

        store.store("plan", "first").unwrap();
        store.store("plan", "second").unwrap();
        assert_eq!(store.fetch("plan").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.fetch("loan-planner-state").unwrap(), None);
        store.store("loan-planner-state", "{\"a\":1}").unwrap();
        assert_eq!(
            store.fetch("loan-planner-state").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert!(dir.path().join("nested/loan-planner-state.json").is_file());
        assert!(!dir.path().join("nested/loan-planner-state.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(store.store(key, "x"), Err(LoanPlannerError::InvalidInput { .. })),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
