use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::KeyValueStorage;
use crate::{ProfileError, Result};

const LOG_PREFIX: &str = "[file-storage]";
const STORAGE_VERSION: i32 = 1;

/// Key-value storage persisted as a single JSON document.
///
/// The file is read on every access and replaced atomically on every
/// write, so several instances pointing at the same path observe each
/// other's changes.
pub struct FileStorage {
    log_prefix: String,
    label: String,
    path: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct FileStorageData {
    version: i32,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Create a new file storage with a diagnostic label and file path
    pub fn new(label: String, path: &Path) -> Self {
        Self {
            log_prefix: format!("{} {}", LOG_PREFIX, label),
            label,
            path: PathBuf::from(path),
        }
    }

    /// Read all entries; a missing file holds no entries.
    pub fn read_fs(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path)?;
        let data: FileStorageData =
            serde_json::from_reader(file).map_err(|err| {
                ProfileError::Storage(self.label.clone(), err.to_string())
            })?;
        self.verify_version(data.version)?;

        log::trace!(
            "{} {} entries read from {}",
            self.log_prefix,
            data.entries.len(),
            self.path.display()
        );
        Ok(data.entries)
    }

    /// Replace the file contents with `entries`.
    pub fn write_fs(&self, entries: BTreeMap<String, String>) -> Result<()> {
        let parent_dir = self.path.parent().ok_or_else(|| {
            ProfileError::Storage(
                self.label.clone(),
                "Failed to get parent directory".to_owned(),
            )
        })?;
        fs::create_dir_all(parent_dir)?;

        let suffix: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(10)
            .collect();
        let tmp_path = parent_dir.join(format!(".tmp-{}", suffix));

        let data = FileStorageData {
            version: STORAGE_VERSION,
            entries,
        };
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &data)?;
            writer.flush()?;
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::info!(
            "{} {} entries have been written",
            self.log_prefix,
            data.entries.len()
        );
        Ok(())
    }

    /// Remove the storage file from disk
    pub fn erase(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|err| {
            ProfileError::Storage(self.label.clone(), err.to_string())
        })
    }

    fn verify_version(&self, version: i32) -> Result<()> {
        match version.cmp(&STORAGE_VERSION) {
            std::cmp::Ordering::Equal => Ok(()),
            std::cmp::Ordering::Greater => Err(ProfileError::Storage(
                self.label.clone(),
                "Storage format is newer than the app".to_owned(),
            )),
            std::cmp::Ordering::Less => Err(ProfileError::Storage(
                self.label.clone(),
                "Storage format is older than the app".to_owned(),
            )),
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_fs()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        let mut entries = self.read_fs()?;
        entries.insert(key.to_owned(), value);
        self.write_fs(entries)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_fs()?;
        if entries.remove(key).is_some() {
            self.write_fs(entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_file_storage_write_read() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("test_storage.json");

        let mut file_storage =
            FileStorage::new("TestStorage".to_string(), &storage_path);

        file_storage.set_item("key1", "value1".to_string()).unwrap();
        file_storage.set_item("key2", "value2".to_string()).unwrap();
        file_storage.remove_item("key1").unwrap();

        let data_read = file_storage
            .read_fs()
            .expect("Failed to read data from disk");
        assert_eq!(data_read.len(), 1);
        assert_eq!(data_read.get("key2").map(|v| v.as_str()), Some("value2"));
    }

    #[test]
    fn test_file_storage_shared_path() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("nested").join("shared.json");

        let mut writer = FileStorage::new("Writer".to_string(), &storage_path);
        let reader = FileStorage::new("Reader".to_string(), &storage_path);

        assert_eq!(reader.get_item("key1").unwrap(), None);
        writer.set_item("key1", "value1".to_string()).unwrap();
        assert_eq!(reader.get_item("key1").unwrap().as_deref(), Some("value1"));
    }

    #[test]
    fn test_file_storage_erase() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("test_storage.json");

        let mut file_storage =
            FileStorage::new("TestStorage".to_string(), &storage_path);
        file_storage.set_item("key1", "value1".to_string()).unwrap();
        assert!(storage_path.exists());

        if let Err(err) = file_storage.erase() {
            panic!("Failed to delete file: {:?}", err);
        }
        assert!(!storage_path.exists());
        assert!(file_storage.erase().is_err());
    }

    #[test]
    fn test_file_storage_rejects_newer_version() {
        let temp_dir =
            TempDir::new("tmp").expect("Failed to create temporary directory");
        let storage_path = temp_dir.path().join("test_storage.json");
        fs::write(&storage_path, r#"{"version": 99, "entries": {}}"#).unwrap();

        let file_storage =
            FileStorage::new("TestStorage".to_string(), &storage_path);
        match file_storage.get_item("key1") {
            Err(ProfileError::Storage(label, _)) => {
                assert_eq!(label, "TestStorage")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
