use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use super::{KeyValueStore, StorageError, StorageEvent};

/// Persistent store backed by a single JSON object on disk.
///
/// Every write goes straight to the file. Other processes may edit the same
/// file; `reload` picks those edits up and reports them as `StorageEvent`s.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating nothing until the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let data = Self::read_file(&path)?;
        debug!(path = %path.display(), keys = data.len(), "Opened file store");
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file and return every key whose value differs
    /// from what this process last saw.
    pub fn reload(&self) -> Result<Vec<StorageEvent>, StorageError> {
        let on_disk = Self::read_file(&self.path)?;
        let mut data = self.data.write();

        let mut events: Vec<StorageEvent> = on_disk
            .iter()
            .filter(|(key, value)| data.get(*key) != Some(*value))
            .map(|(key, value)| StorageEvent {
                key: key.clone(),
                new_value: Some(value.clone()),
            })
            .collect();

        events.extend(
            data.keys()
                .filter(|key| !on_disk.contains_key(*key))
                .map(|key| StorageEvent {
                    key: key.clone(),
                    new_value: None,
                }),
        );

        if !events.is_empty() {
            debug!(changed = events.len(), "File store changed externally");
        }

        *data = on_disk;
        Ok(events)
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_file(&self, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.read().get(key).cloned())
    }

    // Writes merge into the current file contents so keys written by other
    // processes survive. Only `key` is updated in memory, and only once the
    // file write succeeded; `reload` still reports the other keys.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self.data.write();
        let mut on_disk = Self::read_file(&self.path)?;
        on_disk.insert(key.to_string(), value.to_string());
        self.write_file(&on_disk)?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self.data.write();
        let mut on_disk = Self::read_file(&self.path)?;
        if on_disk.remove(key).is_some() {
            self.write_file(&on_disk)?;
        }
        data.remove(key);
        Ok(())
    }
}
