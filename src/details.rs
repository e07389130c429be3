use crate::storage::{Favorites, KeyValueStorage};
use crate::store::ProfileStore;
use crate::{Coordinates, Profile, ProfileError, ProfileId, Result};

pub const NOT_FOUND_MESSAGE: &str =
    "Failed to load profile details. The profile may not exist.";

/// Full page for one profile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileDetails {
    Loaded { profile: Profile, is_favorite: bool },
    /// The requested id does not exist; rendered inline.
    Missing(ProfileId),
}

impl ProfileDetails {
    /// Fetch `id`. An unknown id becomes [`ProfileDetails::Missing`];
    /// only store failures are returned as errors.
    pub async fn open<St, S>(
        store: &St,
        favorites: &Favorites<S>,
        id: ProfileId,
    ) -> Result<Self>
    where
        St: ProfileStore + ?Sized,
        S: KeyValueStorage,
    {
        let profile = match store.get(id).await {
            Ok(profile) => profile,
            Err(ProfileError::NotFound(_)) => {
                log::warn!("details requested for unknown profile {}", id);
                return Ok(ProfileDetails::Missing(id));
            }
            Err(e) => return Err(e),
        };

        let is_favorite = favorites.contains(id).unwrap_or_else(|e| {
            log::warn!("favorites unavailable: {}", e);
            false
        });
        Ok(ProfileDetails::Loaded {
            profile,
            is_favorite,
        })
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            ProfileDetails::Loaded { profile, .. } => Some(profile),
            ProfileDetails::Missing(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            ProfileDetails::Loaded { .. } => None,
            ProfileDetails::Missing(_) => Some(NOT_FOUND_MESSAGE),
        }
    }

    pub fn is_favorite(&self) -> bool {
        matches!(self, ProfileDetails::Loaded { is_favorite: true, .. })
    }

    /// Where the embedded map is centered.
    pub fn map_center(&self) -> Coordinates {
        self.profile()
            .and_then(Profile::location)
            .unwrap_or(crate::DEFAULT_CENTER)
    }

    /// Flip the shown profile's favorite flag and persist it.
    pub fn toggle_favorite<S: KeyValueStorage>(
        &mut self,
        favorites: &mut Favorites<S>,
    ) -> Result<bool> {
        match self {
            ProfileDetails::Loaded {
                profile,
                is_favorite,
            } => {
                *is_favorite = favorites.toggle(profile.id)?;
                Ok(*is_favorite)
            }
            ProfileDetails::Missing(id) => Err(ProfileError::NotFound(*id)),
        }
    }
}
