use std::collections::BTreeSet;

use serde_json::Value;

use super::KeyValueStorage;
use crate::{ProfileId, Result, FAVORITES_KEY};

/// User-local set of favorite profile ids.
///
/// Every operation goes back to the storage, so changes made through
/// another handle on the same storage are visible immediately. Ids of
/// deleted profiles are kept.
pub struct Favorites<S> {
    storage: S,
}

impl<S: KeyValueStorage> Favorites<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current set of ids. An absent key is an empty set; entries that
    /// are not non-negative integers are skipped.
    pub fn ids(&self) -> Result<BTreeSet<ProfileId>> {
        let raw = match self.storage.get_item(FAVORITES_KEY)? {
            Some(raw) => raw,
            None => return Ok(BTreeSet::new()),
        };

        let values: Vec<Value> = serde_json::from_str(&raw)?;
        let ids = values
            .iter()
            .filter_map(|value| match value.as_u64() {
                Some(id) => Some(ProfileId(id)),
                None => {
                    log::warn!("skipping invalid favorite entry {}", value);
                    None
                }
            })
            .collect();
        Ok(ids)
    }

    pub fn contains(&self, id: ProfileId) -> Result<bool> {
        Ok(self.ids()?.contains(&id))
    }

    /// Add `id` if absent, remove it otherwise, and persist.
    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: ProfileId) -> Result<bool> {
        let mut ids = self.ids()?;
        let now_favorite = if ids.remove(&id) {
            false
        } else {
            ids.insert(id);
            true
        };

        let serialized = serde_json::to_string(&ids)?;
        self.storage.set_item(FAVORITES_KEY, serialized)?;

        log::debug!(
            "profile {} {} favorites",
            id,
            if now_favorite { "added to" } else { "removed from" }
        );
        Ok(now_favorite)
    }
}
