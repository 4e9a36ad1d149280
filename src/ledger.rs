//! Reward Ledger
//!
//! Pure token and badge bookkeeping. Every operation takes a profile by
//! reference and returns the updated copy; persisting it is the caller's job.
//!
//! ## Rewards
//!
//! | Action              | Delta   |
//! |---------------------|---------|
//! | Generate recipe     | +10     |
//! | Save recipe         | +5      |
//! | Mint collectible    | +25     |
//! | Daily claim         | +20     |
//! | Complete challenge  | +50     |
//! | Purchase listing    | -price  |

use crate::error::{Error, Result};
use crate::models::{Badge, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GENERATE_RECIPE_REWARD: i64 = 10;
pub const SAVE_RECIPE_REWARD: i64 = 5;
pub const MINT_COLLECTIBLE_REWARD: i64 = 25;
pub const DAILY_CLAIM_REWARD: i64 = 20;
pub const COMPLETE_CHALLENGE_REWARD: i64 = 50;

const AMATEUR_CHEF_RECIPES: u32 = 5;
const MASTER_CHEF_RECIPES: u32 = 20;
const COLLECTOR_NFTS: u32 = 3;
const AMBASSADOR_TOKENS: u64 = 500;

/// Actions that earn a fixed reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardAction {
    GenerateRecipe,
    SaveRecipe,
    MintCollectible,
    DailyClaim,
    CompleteChallenge,
}

impl RewardAction {
    pub fn amount(self) -> i64 {
        match self {
            RewardAction::GenerateRecipe => GENERATE_RECIPE_REWARD,
            RewardAction::SaveRecipe => SAVE_RECIPE_REWARD,
            RewardAction::MintCollectible => MINT_COLLECTIBLE_REWARD,
            RewardAction::DailyClaim => DAILY_CLAIM_REWARD,
            RewardAction::CompleteChallenge => COMPLETE_CHALLENGE_REWARD,
        }
    }
}

impl std::fmt::Display for RewardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardAction::GenerateRecipe => write!(f, "generate_recipe"),
            RewardAction::SaveRecipe => write!(f, "save_recipe"),
            RewardAction::MintCollectible => write!(f, "mint_collectible"),
            RewardAction::DailyClaim => write!(f, "daily_claim"),
            RewardAction::CompleteChallenge => write!(f, "complete_challenge"),
        }
    }
}

/// Counter bumped by an acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    RecipeCreated,
    NftAcquired,
}

/// Stateless reward bookkeeping, passed to whoever needs it
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardLedger;

impl RewardLedger {
    pub fn new() -> Self {
        Self
    }

    /// Returns `profile` with `tokens = max(0, tokens + amount)`.
    ///
    /// No affordability check and no badge evaluation: a zero delta returns
    /// an identical profile. Purchases go through [`RewardLedger::debit`].
    pub fn apply_delta(&self, profile: &UserProfile, amount: i64) -> UserProfile {
        let mut updated = profile.clone();
        updated.tokens = profile.tokens.saturating_add_signed(amount);
        debug!(
            before = profile.tokens,
            after = updated.tokens,
            amount,
            "Applied token delta"
        );
        updated
    }

    /// Applies the fixed reward for `action`
    pub fn reward(&self, profile: &UserProfile, action: RewardAction) -> UserProfile {
        self.apply_delta(profile, action.amount())
    }

    /// Withdraws `price` tokens, refusing instead of clamping when the
    /// balance is short
    pub fn debit(&self, profile: &UserProfile, price: u64) -> Result<UserProfile> {
        if profile.tokens < price {
            return Err(Error::InsufficientBalance {
                required: price,
                available: profile.tokens,
            });
        }
        let amount = i64::try_from(price)
            .map_err(|_| Error::invalid_request(format!("price {} out of range", price)))?;
        Ok(self.apply_delta(profile, -amount))
    }

    /// Bumps the counter for `kind` and re-evaluates badges
    pub fn record_acquisition(&self, profile: &UserProfile, kind: Acquisition) -> UserProfile {
        let mut updated = profile.clone();
        match kind {
            Acquisition::RecipeCreated => {
                updated.recipes_created = updated.recipes_created.saturating_add(1)
            }
            Acquisition::NftAcquired => updated.nfts_owned = updated.nfts_owned.saturating_add(1),
        }
        self.refresh_badges(&updated)
    }

    /// Adds every badge the profile currently qualifies for. Never removes.
    pub fn refresh_badges(&self, profile: &UserProfile) -> UserProfile {
        let mut updated = profile.clone();
        for badge in eligible_badges(profile) {
            if updated.badges.insert(badge) {
                debug!(%badge, "Badge earned");
            }
        }
        updated
    }
}

/// Badges a profile qualifies for from its current counters
pub fn eligible_badges(profile: &UserProfile) -> Vec<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| match badge {
            Badge::Beginner => true,
            Badge::AmateurChef => profile.recipes_created >= AMATEUR_CHEF_RECIPES,
            Badge::MasterChef => profile.recipes_created >= MASTER_CHEF_RECIPES,
            Badge::Collector => profile.nfts_owned >= COLLECTOR_NFTS,
            Badge::Ambassador => profile.tokens >= AMBASSADOR_TOKENS,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with(tokens: u64, recipes: u32, nfts: u32) -> UserProfile {
        let mut profile = UserProfile::default();
        profile.tokens = tokens;
        profile.recipes_created = recipes;
        profile.nfts_owned = nfts;
        profile
    }

    #[test]
    fn test_apply_delta_clamps_at_zero() {
        let ledger = RewardLedger::new();
        let cases = [(100, 10, 110), (100, -30, 70), (50, -150, 0), (0, -1, 0)];
        for (start, delta, expected) in cases {
            let profile = profile_with(start, 0, 0);
            assert_eq!(ledger.apply_delta(&profile, delta).tokens, expected);
        }
    }

    #[test]
    fn test_apply_delta_keeps_counters_and_badges() {
        let ledger = RewardLedger::new();
        let mut profile = profile_with(40, 7, 4);
        profile.badges.insert(Badge::AmateurChef);
        profile.badges.insert(Badge::Collector);

        let updated = ledger.apply_delta(&profile, -1_000);
        assert_eq!(updated.recipes_created, 7);
        assert_eq!(updated.nfts_owned, 4);
        assert_eq!(updated.badges, profile.badges);
    }

    #[test]
    fn test_zero_delta_is_identity() {
        let ledger = RewardLedger::new();
        // Qualifies for Ambassador but a zero delta must not evaluate badges
        let profile = profile_with(500, 0, 0);
        assert_eq!(ledger.apply_delta(&profile, 0), profile);
    }

    #[test]
    fn test_reward_amounts() {
        assert_eq!(RewardAction::GenerateRecipe.amount(), 10);
        assert_eq!(RewardAction::SaveRecipe.amount(), 5);
        assert_eq!(RewardAction::MintCollectible.amount(), 25);
        assert_eq!(RewardAction::DailyClaim.amount(), 20);
        assert_eq!(RewardAction::CompleteChallenge.amount(), 50);
    }

    #[test]
    fn test_debit_rejects_short_balance() {
        let ledger = RewardLedger::new();
        let profile = profile_with(50, 0, 0);

        match ledger.debit(&profile, 150) {
            Err(Error::InsufficientBalance {
                required,
                available,
            }) => {
                assert_eq!(required, 150);
                assert_eq!(available, 50);
            }
            other => panic!("expected insufficient balance, got {:?}", other),
        }

        assert_eq!(ledger.debit(&profile, 50).unwrap().tokens, 0);
    }

    #[test]
    fn test_amateur_chef_after_five_recipes() {
        let ledger = RewardLedger::new();
        let mut profile = UserProfile::default();
        for _ in 0..4 {
            profile = ledger.record_acquisition(&profile, Acquisition::RecipeCreated);
        }
        assert!(!profile.has_badge(Badge::AmateurChef));

        profile = ledger.record_acquisition(&profile, Acquisition::RecipeCreated);
        assert_eq!(profile.recipes_created, 5);
        assert!(profile.has_badge(Badge::AmateurChef));
        assert!(!profile.has_badge(Badge::MasterChef));
    }

    #[test]
    fn test_collector_after_three_nfts() {
        let ledger = RewardLedger::new();
        let profile = profile_with(100, 0, 2);
        let updated = ledger.record_acquisition(&profile, Acquisition::NftAcquired);
        assert_eq!(updated.nfts_owned, 3);
        assert!(updated.has_badge(Badge::Collector));
    }

    #[test]
    fn test_ambassador_at_exactly_500() {
        let ledger = RewardLedger::new();
        let profile = ledger.refresh_badges(&profile_with(500, 0, 0));
        assert!(profile.has_badge(Badge::Ambassador));

        let short = ledger.refresh_badges(&profile_with(499, 0, 0));
        assert!(!short.has_badge(Badge::Ambassador));
    }

    #[test]
    fn test_badges_are_never_revoked() {
        let ledger = RewardLedger::new();
        let earned = ledger.refresh_badges(&profile_with(600, 0, 0));
        assert!(earned.has_badge(Badge::Ambassador));

        let spent = ledger.debit(&earned, 550).unwrap();
        let after = ledger.record_acquisition(&spent, Acquisition::NftAcquired);
        assert_eq!(after.tokens, 50);
        assert!(after.has_badge(Badge::Ambassador));
        assert!(after.badges.is_superset(&earned.badges));
    }

    #[test]
    fn test_eligible_badges_always_includes_beginner() {
        let profile = profile_with(0, 0, 0);
        assert_eq!(eligible_badges(&profile), vec![Badge::Beginner]);

        let veteran = profile_with(900, 25, 3);
        assert_eq!(eligible_badges(&veteran), Badge::ALL.to_vec());
    }
}
