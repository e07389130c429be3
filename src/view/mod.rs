//! View state of the profile directory: which profiles are visible, in
//! what order, and which one the map is focused on.

mod pipeline;

use std::collections::BTreeSet;
use std::sync::Arc;

pub use pipeline::{compare, derive, Filter, Query, SortDirection, SortKey};

use crate::storage::{Favorites, KeyValueStorage};
use crate::store::ProfileStore;
use crate::{Profile, ProfileError, ProfileId, Result};

pub const LOAD_ERROR_MESSAGE: &str =
    "Failed to load profiles. Please try again later.";

/// Immutable picture of the view state handed to renderers.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Visible profiles, filtered and sorted.
    pub profiles: Arc<Vec<Profile>>,
    pub total: usize,
    pub query: Query,
    pub selected: Option<Profile>,
    pub show_all_on_map: bool,
    pub favorites: Arc<BTreeSet<ProfileId>>,
    pub loading: bool,
    /// Retryable failure message, shown until dismissed or until the
    /// next successful load.
    pub error: Option<String>,
}

impl ViewSnapshot {
    pub fn is_favorite(&self, id: ProfileId) -> bool {
        self.favorites.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Owner of the fetched profiles and of every input of the visible
/// list. Each transition recomputes the visible list synchronously and
/// returns a fresh snapshot.
pub struct ProfileCollection<S> {
    all_profiles: Vec<Profile>,
    filtered: Arc<Vec<Profile>>,
    query: Query,
    selected: Option<Profile>,
    show_all_on_map: bool,
    favorites: Favorites<S>,
    favorite_ids: Arc<BTreeSet<ProfileId>>,
    loading: bool,
    error: Option<String>,
}

impl<S: KeyValueStorage> ProfileCollection<S> {
    pub fn new(favorites: Favorites<S>) -> Self {
        let favorite_ids = match favorites.ids() {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!("favorites unavailable: {}", e);
                BTreeSet::new()
            }
        };

        Self {
            all_profiles: Vec::new(),
            filtered: Arc::new(Vec::new()),
            query: Query::default(),
            selected: None,
            show_all_on_map: false,
            favorites,
            favorite_ids: Arc::new(favorite_ids),
            loading: false,
            error: None,
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            profiles: Arc::clone(&self.filtered),
            total: self.all_profiles.len(),
            query: self.query.clone(),
            selected: self.selected.clone(),
            show_all_on_map: self.show_all_on_map,
            favorites: Arc::clone(&self.favorite_ids),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    pub fn all_profiles(&self) -> &[Profile] {
        &self.all_profiles
    }

    /// Fetch the full set from `store` and rebuild the view.
    ///
    /// On failure the previous profiles stay visible and a retryable
    /// error is recorded.
    pub async fn load<St>(&mut self, store: &St) -> Result<ViewSnapshot>
    where
        St: ProfileStore + ?Sized,
    {
        self.begin_load();
        let fetched = store.list().await;
        self.finish_load(fetched)
    }

    /// Mark a fetch as in flight.
    pub fn begin_load(&mut self) -> ViewSnapshot {
        self.loading = true;
        self.snapshot()
    }

    /// Apply the outcome of a fetch. Outcomes are applied in the order
    /// they are delivered, so a late response replaces a newer one.
    pub fn finish_load(
        &mut self,
        fetched: Result<Vec<Profile>>,
    ) -> Result<ViewSnapshot> {
        self.loading = false;

        let profiles = match fetched {
            Ok(profiles) => profiles,
            Err(e) => {
                log::error!("loading profiles failed: {}", e);
                self.error = Some(LOAD_ERROR_MESSAGE.to_owned());
                return Err(match e {
                    fetch @ ProfileError::Fetch(_) => fetch,
                    other => ProfileError::Fetch(other.to_string()),
                });
            }
        };

        log::info!("{} profiles loaded", profiles.len());
        self.all_profiles = dedup_by_id(profiles);
        self.error = None;
        self.query.term.clear();

        self.selected = self.selected.take().and_then(|selected| {
            self.all_profiles
                .iter()
                .find(|p| p.id == selected.id)
                .cloned()
        });

        Ok(self.recompute())
    }

    /// Apply a text search over name, address, description and
    /// interests. Only an empty term removes the text predicate;
    /// whitespace is matched as typed.
    pub fn search(&mut self, term: &str) -> ViewSnapshot {
        log::debug!("search {:?}", term);
        self.query.term = term.to_owned();
        self.recompute()
    }

    pub fn toggle_filter(&mut self, filter: Filter) -> ViewSnapshot {
        if !self.query.filters.remove(&filter) {
            self.query.filters.insert(filter);
        }
        log::debug!("active filters: {:?}", self.query.filters);
        self.recompute()
    }

    /// Drop every filter and the search term.
    pub fn clear_filters(&mut self) -> ViewSnapshot {
        self.query.filters.clear();
        self.query.term.clear();
        self.recompute()
    }

    /// Selecting the current key flips the direction; another key is
    /// applied with the current direction.
    pub fn set_sort(&mut self, key: SortKey) -> ViewSnapshot {
        if key == self.query.sort_key {
            self.query.direction = self.query.direction.flipped();
        } else {
            self.query.sort_key = key;
        }
        log::debug!(
            "sorting by {:?} {:?}",
            self.query.sort_key,
            self.query.direction
        );
        self.recompute()
    }

    pub fn select(&mut self, profile: &Profile) -> Result<ViewSnapshot> {
        self.select_by_id(profile.id)
    }

    /// Focus a single profile; this leaves the "show all" mode.
    pub fn select_by_id(&mut self, id: ProfileId) -> Result<ViewSnapshot> {
        let profile = self
            .all_profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ProfileError::NotFound(id))?;

        log::debug!("profile {} selected", id);
        self.selected = Some(profile);
        self.show_all_on_map = false;
        Ok(self.snapshot())
    }

    pub fn clear_selection(&mut self) -> ViewSnapshot {
        self.selected = None;
        self.snapshot()
    }

    pub fn set_show_all_on_map(&mut self, show_all: bool) -> ViewSnapshot {
        self.show_all_on_map = show_all;
        if show_all {
            self.selected = None;
        }
        self.snapshot()
    }

    /// Flip `id` in the persisted favorites. The visible list only
    /// changes while the favorites filter is active.
    pub fn toggle_favorite(&mut self, id: ProfileId) -> Result<ViewSnapshot> {
        self.favorites.toggle(id)?;

        if self.query.filters.contains(&Filter::Favorites) {
            Ok(self.recompute())
        } else {
            self.reload_favorites();
            Ok(self.snapshot())
        }
    }

    pub fn dismiss_error(&mut self) -> ViewSnapshot {
        self.error = None;
        self.snapshot()
    }

    /// Favorites may be changed through other handles on the same
    /// storage; an unreadable storage keeps the previous set.
    fn reload_favorites(&mut self) {
        match self.favorites.ids() {
            Ok(ids) => self.favorite_ids = Arc::new(ids),
            Err(e) => log::warn!("keeping previous favorites: {}", e),
        }
    }

    fn recompute(&mut self) -> ViewSnapshot {
        self.reload_favorites();
        self.filtered = Arc::new(derive(
            &self.all_profiles,
            &self.query,
            &self.favorite_ids,
        ));
        self.snapshot()
    }
}

fn dedup_by_id(profiles: Vec<Profile>) -> Vec<Profile> {
    let mut seen = BTreeSet::new();
    profiles
        .into_iter()
        .filter(|profile| {
            let fresh = seen.insert(profile.id);
            if !fresh {
                log::warn!("dropping duplicate profile id {}", profile.id);
            }
            fresh
        })
        .collect()
}
