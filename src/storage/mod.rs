mod favorites;
mod file_storage;

use std::collections::BTreeMap;

pub use favorites::Favorites;
pub use file_storage::FileStorage;

use crate::Result;

/// String key-value storage with the contract of browser local storage.
pub trait KeyValueStorage {
    /// Read the value under `key`, `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace the value under `key`.
    fn set_item(&mut self, key: &str, value: String) -> Result<()>;

    /// Remove the value under `key`. Removing an absent key is not
    /// an error.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Storage that lives as long as the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}
