//! Administrative table of profiles with search, paging and deletion.

use crate::store::ProfileStore;
use crate::view::LOAD_ERROR_MESSAGE;
use crate::{Profile, ProfileError, ProfileId, Result};

pub const DELETE_ERROR_MESSAGE: &str =
    "Failed to delete profile. Please try again.";

#[derive(Debug, Clone)]
pub struct AdminProfileList {
    profiles: Vec<Profile>,
    term: String,
    page: usize,
    rows_per_page: usize,
    pending_delete: Option<ProfileId>,
    loading: bool,
    error: Option<String>,
}

impl AdminProfileList {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            profiles: Vec::new(),
            term: String::new(),
            page: 0,
            rows_per_page: rows_per_page.max(1),
            pending_delete: None,
            loading: false,
            error: None,
        }
    }

    pub async fn load<St>(&mut self, store: &St) -> Result<()>
    where
        St: ProfileStore + ?Sized,
    {
        self.loading = true;
        let fetched = store.list().await;
        self.loading = false;

        match fetched {
            Ok(profiles) => {
                log::info!("admin list loaded {} profiles", profiles.len());
                self.profiles = profiles;
                self.error = None;
                self.clamp_page();
                Ok(())
            }
            Err(e) => {
                log::error!("admin list load failed: {}", e);
                self.error = Some(LOAD_ERROR_MESSAGE.to_owned());
                Err(e)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn search(&mut self, term: &str) {
        self.term = term.to_owned();
        self.page = 0;
    }

    /// Profiles whose name, address or contact contain the search term.
    pub fn matching(&self) -> Vec<&Profile> {
        let term = self.term.trim().to_lowercase();
        self.profiles
            .iter()
            .filter(|profile| {
                term.is_empty()
                    || [&profile.name, &profile.address, &profile.contact]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Number of pages for the current search, at least one.
    pub fn page_count(&self) -> usize {
        let rows = self.matching().len();
        rows.div_ceil(self.rows_per_page).max(1)
    }

    /// Rows of the current page.
    pub fn rows(&self) -> Vec<&Profile> {
        self.matching()
            .into_iter()
            .skip(self.page.saturating_mul(self.rows_per_page))
            .take(self.rows_per_page)
            .collect()
    }

    /// Move to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.rows_per_page = rows_per_page.max(1);
        self.page = 0;
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: ProfileId) -> Result<()> {
        if !self.profiles.iter().any(|p| p.id == id) {
            return Err(ProfileError::NotFound(id));
        }
        self.pending_delete = Some(id);
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<&Profile> {
        let id = self.pending_delete?;
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the profile awaiting confirmation, if any. On failure the
    /// row stays and an error message is shown.
    pub async fn confirm_delete<St>(
        &mut self,
        store: &St,
    ) -> Result<Option<ProfileId>>
    where
        St: ProfileStore + ?Sized,
    {
        let id = match self.pending_delete.take() {
            Some(id) => id,
            None => return Ok(None),
        };

        if let Err(e) = store.delete(id).await {
            log::error!("deleting profile {} failed: {}", id, e);
            self.error = Some(DELETE_ERROR_MESSAGE.to_owned());
            return Err(e);
        }

        self.profiles.retain(|p| p.id != id);
        self.error = None;
        self.clamp_page();
        Ok(Some(id))
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
    }
}

impl Default for AdminProfileList {
    fn default() -> Self {
        Self::new(crate::config::Config::default().rows_per_page)
    }
}
