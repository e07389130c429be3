use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::Latency;
use crate::data::mock_profiles;
use crate::{Profile, ProfileData, ProfileError, ProfileId, Result};

/// Authoritative profile collection.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Profile>>;

    async fn get(&self, id: ProfileId) -> Result<Profile>;

    /// Store a new profile under a freshly assigned id.
    async fn create(&self, data: ProfileData) -> Result<Profile>;

    async fn update(&self, id: ProfileId, data: ProfileData) -> Result<Profile>;

    async fn delete(&self, id: ProfileId) -> Result<()>;
}

struct Records {
    profiles: Vec<Profile>,
    last_id: ProfileId,
}

/// Store kept in memory for the lifetime of the owning object.
pub struct MemoryProfileStore {
    records: RwLock<Records>,
    latency: Latency,
}

impl MemoryProfileStore {
    pub fn new(profiles: Vec<Profile>, latency: Latency) -> Self {
        let last_id = profiles
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(ProfileId(0));

        Self {
            records: RwLock::new(Records { profiles, last_id }),
            latency,
        }
    }

    /// Store seeded with the demo profiles.
    pub fn seeded(latency: Latency) -> Self {
        Self::new(mock_profiles(), latency)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.profiles.len()
    }

    async fn simulate(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn list(&self) -> Result<Vec<Profile>> {
        self.simulate(self.latency.read()).await;
        Ok(self.records.read().await.profiles.clone())
    }

    async fn get(&self, id: ProfileId) -> Result<Profile> {
        self.simulate(self.latency.read()).await;
        self.records
            .read()
            .await
            .profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ProfileError::NotFound(id))
    }

    async fn create(&self, data: ProfileData) -> Result<Profile> {
        self.simulate(self.latency.write()).await;
        let mut records = self.records.write().await;

        let id = records.last_id.next();
        records.last_id = id;

        let profile = Profile::from_data(id, data);
        records.profiles.push(profile.clone());

        log::info!("profile {} created", id);
        Ok(profile)
    }

    async fn update(
        &self,
        id: ProfileId,
        data: ProfileData,
    ) -> Result<Profile> {
        self.simulate(self.latency.write()).await;
        let mut records = self.records.write().await;

        let profile = records
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ProfileError::NotFound(id))?;
        profile.merge(data);

        log::info!("profile {} updated", id);
        Ok(profile.clone())
    }

    async fn delete(&self, id: ProfileId) -> Result<()> {
        self.simulate(self.latency.delete()).await;
        let mut records = self.records.write().await;

        let index = records
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or(ProfileError::NotFound(id))?;
        records.profiles.remove(index);

        log::info!("profile {} deleted", id);
        Ok(())
    }
}
