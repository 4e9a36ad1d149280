//! Profile Store
//!
//! Durable, whole-record persistence of a user's profile and collections on
//! top of a [`KeyValueStore`]. There are no partial-field updates: callers
//! load a record, compute the new one and save it back.

use crate::error::{Error, Result};
use crate::models::{CollectibleListing, Recipe, UserProfile};
use crate::storage::{KeyValueStore, Scope};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const PROFILE_KEY: &str = "remix_user_profile";
pub const RECIPES_KEY: &str = "remix_user_recipes";
pub const OWNED_COLLECTIBLES_KEY: &str = "remix_my_nfts";
pub const MARKETPLACE_KEY: &str = "remix_marketplace_nfts";

#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted profile, `None` on first run
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Option<UserProfile>> {
        self.read(Scope::User, PROFILE_KEY).await
    }

    /// Overwrite the persisted profile
    #[instrument(skip(self, profile), fields(tokens = profile.tokens))]
    pub async fn save(&self, profile: &UserProfile) -> Result<()> {
        self.write(Scope::User, PROFILE_KEY, profile).await
    }

    pub async fn load_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.read(Scope::User, RECIPES_KEY).await?.unwrap_or_default())
    }

    pub async fn save_recipes(&self, recipes: &[Recipe]) -> Result<()> {
        self.write(Scope::User, RECIPES_KEY, recipes).await
    }

    pub async fn load_owned(&self) -> Result<Vec<CollectibleListing>> {
        Ok(self
            .read(Scope::User, OWNED_COLLECTIBLES_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_owned(&self, owned: &[CollectibleListing]) -> Result<()> {
        self.write(Scope::User, OWNED_COLLECTIBLES_KEY, owned).await
    }

    /// Shared marketplace listings, `None` until seeded
    pub async fn load_marketplace(&self) -> Result<Option<Vec<CollectibleListing>>> {
        self.read(Scope::Shared, MARKETPLACE_KEY).await
    }

    pub async fn save_marketplace(&self, listings: &[CollectibleListing]) -> Result<()> {
        self.write(Scope::Shared, MARKETPLACE_KEY, listings).await
    }

    async fn read<T: DeserializeOwned>(
        &self,
        scope: Scope,
        key: &'static str,
    ) -> Result<Option<T>> {
        let Some(raw) = self.store.get(scope, key).await? else {
            debug!(key, "No stored value");
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| Error::StorageRead {
            key: key.into(),
            message: format!("stored value is not a valid record: {}", e).into(),
            source: Some(Box::new(e)),
        })
    }

    async fn write<T: Serialize + ?Sized>(
        &self,
        scope: Scope,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| Error::StorageWrite {
            key: key.into(),
            message: format!("failed to encode record: {}", e).into(),
            source: Some(Box::new(e)),
        })?;
        self.store.set(scope, key, &raw).await?;
        debug!(key, bytes = raw.len(), "Stored value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Badge, Rarity};
    use crate::storage::MemoryStore;

    fn store() -> (MemoryStore, ProfileStore) {
        let memory = MemoryStore::new("alice");
        let profiles = ProfileStore::new(Arc::new(memory.clone()));
        (memory, profiles)
    }

    #[tokio::test]
    async fn test_load_on_first_run_is_none() {
        let (_, profiles) = store();
        assert_eq!(profiles.load().await.unwrap(), None);
        assert!(profiles.load_recipes().await.unwrap().is_empty());
        assert!(profiles.load_owned().await.unwrap().is_empty());
        assert_eq!(profiles.load_marketplace().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let (_, profiles) = store();
        let mut profile = UserProfile::new("Remy");
        profile.tokens = 245;
        profile.recipes_created = 6;
        profile.badges.insert(Badge::AmateurChef);

        profiles.save(&profile).await.unwrap();
        assert_eq!(profiles.load().await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_record() {
        let (_, profiles) = store();
        let mut profile = UserProfile::default();
        profiles.save(&profile).await.unwrap();

        profile.tokens = 7;
        profile.name = "Renamed".to_string();
        profiles.save(&profile).await.unwrap();

        let loaded = profiles.load().await.unwrap().unwrap();
        assert_eq!(loaded.tokens, 7);
        assert_eq!(loaded.name, "Renamed");
    }

    #[tokio::test]
    async fn test_corrupt_record_is_read_error() {
        let (memory, profiles) = store();
        memory.set(Scope::User, PROFILE_KEY, "{not json").await.unwrap();

        let err = profiles.load().await.unwrap_err();
        assert!(matches!(err, Error::StorageRead { .. }));
    }

    #[tokio::test]
    async fn test_write_failure_is_surfaced() {
        let (memory, profiles) = store();
        memory.fail_writes(true);

        let err = profiles.save(&UserProfile::default()).await.unwrap_err();
        assert!(matches!(err, Error::StorageWrite { .. }));
        assert_eq!(profiles.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_marketplace_is_shared_between_users() {
        let (memory, alice) = store();
        let bob = ProfileStore::new(Arc::new(memory.for_owner("bob")));

        let listing = CollectibleListing {
            id: 1,
            name: "White Truffle Risotto".to_string(),
            category: "italian".to_string(),
            price: 150,
            rarity: Rarity::Epic,
            likes: 342,
            creator: None,
            description: None,
        };
        alice.save_marketplace(&[listing.clone()]).await.unwrap();
        alice.save_owned(&[listing.clone()]).await.unwrap();

        assert_eq!(bob.load_marketplace().await.unwrap(), Some(vec![listing]));
        assert!(bob.load_owned().await.unwrap().is_empty());
    }
}
