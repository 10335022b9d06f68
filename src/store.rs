use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use crate::config::TaskcloserConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// String-keyed persistence facade. Each model owns exactly one key and
/// writes its whole collection under it; there is no cross-key transaction.
///
/// Reads never fail: any I/O or parse problem surfaces as "no data" and the
/// owning model falls back to its seed. Write failures are reported so the
/// caller can log them, but nothing recovers from one.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str);
}

/// On-disk store: one file per key inside the data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(config: &TaskcloserConfig) -> Result<Self, StoreError> {
        config.ensure_dir()?;
        Ok(Self {
            dir: config.data_directory.clone(),
        })
    }

    /// Open a store rooted at an explicit directory, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.key_path(key)) {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("failed to remove key {key}: {e}");
            }
        }
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}
