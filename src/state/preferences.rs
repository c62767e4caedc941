/// Client-local key/value preference storage
///
/// Values are plain strings. A missing key is a distinct state from any
/// stored value.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;

/// Persistent string preferences
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// On-disk layout of the preference file: one flat JSON object of strings
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct PreferenceFile {
    values: BTreeMap<String, String>,
}

/// Preferences kept as a flat JSON object on disk
pub struct FileStore {
    path: PathBuf,
    file: Mutex<PreferenceFile>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file is missing.
    ///
    /// A corrupt file is logged and treated as empty; it is overwritten on
    /// the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match Self::read(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!("⚠️  Ignoring unreadable preferences at {}: {}", path.display(), err);
                PreferenceFile::default()
            }
        };

        debug!("📁 Preferences loaded from {}", path.display());
        Self {
            path,
            file: Mutex::new(file),
        }
    }

    fn read(path: &Path) -> Result<PreferenceFile, StorageError> {
        if !path.exists() {
            return Ok(PreferenceFile::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write(&self, file: &PreferenceFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.file.lock().values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut file = self.file.lock();
        file.values.insert(key.to_string(), value.to_string());
        self.write(&file)
    }
}

/// In-process preferences that vanish with the process
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
