//! Domain records persisted by the profile store
//!
//! Field names serialize in camelCase so records written by the web
//! front-end load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Starting balance for a freshly created profile
pub const STARTING_TOKENS: u64 = 100;

pub const DEFAULT_NAME: &str = "Anonymous Chef";
pub const DEFAULT_AVATAR: &str = "👨‍🍳";

/// A user's token balance, counters and earned badges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
    pub tokens: u64,
    pub recipes_created: u32,
    pub nfts_owned: u32,
    pub badges: BTreeSet<Badge>,
    pub join_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_daily_claim: Option<DateTime<Utc>>,
    /// Fields written by other clients (e.g. `farcasterUsername`), kept
    /// as-is across a load and save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Create the first-run profile for a user
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: DEFAULT_AVATAR.to_string(),
            tokens: STARTING_TOKENS,
            recipes_created: 0,
            nfts_owned: 0,
            badges: BTreeSet::from([Badge::Beginner]),
            join_date: Utc::now(),
            last_daily_claim: None,
            extra: Map::new(),
        }
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

/// Earned, non-revocable status flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Badge {
    Beginner,
    #[serde(alias = "Amateur Chef")]
    AmateurChef,
    #[serde(alias = "Master Chef")]
    MasterChef,
    Collector,
    Ambassador,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::Beginner,
        Badge::AmateurChef,
        Badge::MasterChef,
        Badge::Collector,
        Badge::Ambassador,
    ];
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Badge::Beginner => write!(f, "Beginner"),
            Badge::AmateurChef => write!(f, "Amateur Chef"),
            Badge::MasterChef => write!(f, "Master Chef"),
            Badge::Collector => write!(f, "Collector"),
            Badge::Ambassador => write!(f, "Ambassador"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub carbs: String,
}

/// A generated recipe. Immutable once stored.
///
/// `id`, `createdAt` and `cuisine` are absent from the model output and are
/// filled in by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(alias = "prep_time")]
    pub prep_time: u32,
    #[serde(alias = "cook_time")]
    pub cook_time: u32,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Recipe ids are strings here; the web front-end stored millisecond
/// timestamps
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// A purchasable collectible in the shared marketplace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectibleListing {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: u64,
    pub rarity: Rarity,
    pub likes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
