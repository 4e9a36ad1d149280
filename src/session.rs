//! User session
//!
//! The single state container for one active user. Owns the injected
//! [`ProfileStore`], [`RewardLedger`] and [`RecipeGenerator`] and runs every
//! user-facing action as one "read full profile, compute, write full profile"
//! unit.
//!
//! Actions are serialised behind a mutex so concurrent HTTP requests cannot
//! interleave two read-modify-write units. The generation call runs before
//! the lock is taken: while it is pending no shared state is touched, and a
//! caller that gives up simply drops the future.

use crate::error::{Error, Result};
use crate::generator::{RecipeGenerator, RecipeRequest};
use crate::ledger::{Acquisition, RewardAction, RewardLedger};
use crate::marketplace::{seed_listings, ListingFilter};
use crate::models::{CollectibleListing, Recipe, UserProfile};
use crate::profile_store::ProfileStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// A freshly generated recipe and the profile after the generation reward
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub profile: UserProfile,
}

pub struct Session {
    profiles: ProfileStore,
    ledger: RewardLedger,
    generator: Arc<dyn RecipeGenerator>,
    default_name: String,
    lock: Mutex<()>,
}

impl Session {
    pub fn new(
        profiles: ProfileStore,
        ledger: RewardLedger,
        generator: Arc<dyn RecipeGenerator>,
        default_name: impl Into<String>,
    ) -> Self {
        Self {
            profiles,
            ledger,
            generator,
            default_name: default_name.into(),
            lock: Mutex::new(()),
        }
    }

    /// First-run setup: create the default profile and seed the shared
    /// marketplace when either is missing
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Result<UserProfile> {
        let _guard = self.lock.lock().await;
        let profile = self.load_or_init().await?;

        if self.profiles.load_marketplace().await?.is_none() {
            let listings = seed_listings();
            self.profiles.save_marketplace(&listings).await?;
            info!("🛒 Seeded marketplace with {} listings", listings.len());
        }

        Ok(profile)
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        let _guard = self.lock.lock().await;
        self.load_or_init().await
    }

    pub async fn recipes(&self) -> Result<Vec<Recipe>> {
        self.profiles.load_recipes().await
    }

    pub async fn owned_collectibles(&self) -> Result<Vec<CollectibleListing>> {
        self.profiles.load_owned().await
    }

    pub async fn marketplace(&self, filter: &ListingFilter) -> Result<Vec<CollectibleListing>> {
        let listings = self.profiles.load_marketplace().await?.unwrap_or_default();
        Ok(filter.apply(&listings).cloned().collect())
    }

    /// Ask the generator for a recipe, then grant the generation reward.
    /// The recipe is not saved.
    #[instrument(skip(self, request), fields(cuisine = %request.cuisine))]
    pub async fn generate_recipe(&self, request: &RecipeRequest) -> Result<GeneratedRecipe> {
        let recipe = self.generator.generate(request).await.map_err(|e| {
            warn!("Recipe generation failed: {}", e);
            e
        })?;

        let profile = self.apply_reward(RewardAction::GenerateRecipe).await?;
        Ok(GeneratedRecipe { recipe, profile })
    }

    /// Append `recipe` to the user's collection and grant the save reward.
    /// If the profile write fails the recipe list is put back as it was.
    #[instrument(skip(self, recipe), fields(title = %recipe.title))]
    pub async fn save_recipe(&self, mut recipe: Recipe) -> Result<UserProfile> {
        let _guard = self.lock.lock().await;

        if recipe.id.is_empty() {
            recipe.id = uuid::Uuid::new_v4().to_string();
        }

        let previous = self.profiles.load_recipes().await?;
        if previous.iter().any(|saved| saved.id == recipe.id) {
            return Err(Error::invalid_request(format!(
                "recipe {} is already saved",
                recipe.id
            )));
        }

        let profile = self.load_or_init().await?;
        let rewarded = self.ledger.reward(&profile, RewardAction::SaveRecipe);
        let updated = self.ledger.refresh_badges(
            &self
                .ledger
                .record_acquisition(&rewarded, Acquisition::RecipeCreated),
        );

        let mut recipes = previous.clone();
        recipes.push(recipe);
        self.profiles.save_recipes(&recipes).await?;
        if let Err(e) = self.profiles.save(&updated).await {
            if let Err(restore) = self.profiles.save_recipes(&previous).await {
                warn!("Failed to restore recipe list: {}", restore);
            }
            return Err(e);
        }

        info!(
            "📖 Recipe saved: tokens={}, recipes_created={}",
            updated.tokens, updated.recipes_created
        );
        Ok(updated)
    }

    /// Mint a collectible from a generated recipe
    #[instrument(skip(self, recipe), fields(title = %recipe.title))]
    pub async fn mint_collectible(&self, recipe: &Recipe) -> Result<UserProfile> {
        if recipe.title.trim().is_empty() {
            return Err(Error::invalid_request("cannot mint a recipe without a title"));
        }
        self.apply_reward(RewardAction::MintCollectible).await
    }

    /// Buy a marketplace listing. A short balance is rejected before any
    /// write; the ledger never clamps a purchase.
    #[instrument(skip(self))]
    pub async fn purchase(&self, listing_id: u64) -> Result<UserProfile> {
        let _guard = self.lock.lock().await;

        let listing = self
            .profiles
            .load_marketplace()
            .await?
            .unwrap_or_default()
            .into_iter()
            .find(|listing| listing.id == listing_id)
            .ok_or_else(|| Error::not_found("listing", listing_id.to_string()))?;

        let profile = self.load_or_init().await?;
        let debited = self.ledger.debit(&profile, listing.price).map_err(|e| {
            warn!(
                price = listing.price,
                balance = profile.tokens,
                "Purchase rejected"
            );
            e
        })?;
        let updated = self.ledger.refresh_badges(
            &self
                .ledger
                .record_acquisition(&debited, Acquisition::NftAcquired),
        );

        let previous = self.profiles.load_owned().await?;
        let name = listing.name.clone();
        let mut owned = previous.clone();
        owned.push(listing);
        self.profiles.save_owned(&owned).await?;
        if let Err(e) = self.profiles.save(&updated).await {
            if let Err(restore) = self.profiles.save_owned(&previous).await {
                warn!("Failed to restore owned collectibles: {}", restore);
            }
            return Err(e);
        }

        info!(
            "🎨 Purchased '{}': tokens={}, nfts_owned={}",
            name, updated.tokens, updated.nfts_owned
        );
        Ok(updated)
    }

    /// Daily reward, at most once per UTC calendar day
    pub async fn claim_daily(&self) -> Result<UserProfile> {
        self.claim_daily_at(Utc::now()).await
    }

    pub(crate) async fn claim_daily_at(&self, now: DateTime<Utc>) -> Result<UserProfile> {
        let _guard = self.lock.lock().await;
        let profile = self.load_or_init().await?;

        if let Some(last) = profile.last_daily_claim {
            if last.date_naive() == now.date_naive() {
                return Err(Error::AlreadyClaimed);
            }
        }

        let mut updated = self.ledger.reward(&profile, RewardAction::DailyClaim);
        updated.last_daily_claim = Some(now);
        let updated = self.ledger.refresh_badges(&updated);
        self.profiles.save(&updated).await?;

        info!("🎁 Daily reward claimed: tokens={}", updated.tokens);
        Ok(updated)
    }

    pub async fn complete_challenge(&self) -> Result<UserProfile> {
        self.apply_reward(RewardAction::CompleteChallenge).await
    }

    async fn apply_reward(&self, action: RewardAction) -> Result<UserProfile> {
        let _guard = self.lock.lock().await;
        let profile = self.load_or_init().await?;
        let updated = self
            .ledger
            .refresh_badges(&self.ledger.reward(&profile, action));
        self.profiles.save(&updated).await?;

        info!(
            "🪙 {} reward: {} -> {} tokens",
            action, profile.tokens, updated.tokens
        );
        Ok(updated)
    }

    /// Caller must hold the session lock
    async fn load_or_init(&self) -> Result<UserProfile> {
        if let Some(profile) = self.profiles.load().await? {
            return Ok(profile);
        }

        let profile = UserProfile::new(self.default_name.clone());
        self.profiles.save(&profile).await?;
        info!("👨‍🍳 Created profile for '{}'", profile.name);
        Ok(profile)
    }
}
