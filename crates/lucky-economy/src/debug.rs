//! Debug actions for test accounts.
//!
//! Every action needs the caller's debug authorization, which the host
//! decides (per account or per environment). Actions arrive as tagged JSON
//! objects, `{"type": "add_coins", "amount": 500}`.

use chrono::{DateTime, Utc};
use lucky_core::distribution::highest_unlocked_tier;
use lucky_core::{BalanceConfig, Catalog};
use lucky_ledger::{apply_upgrade, upgrade_cap};
use lucky_types::{DrawOverride, Mutation, PlayerEconomyState, UpgradeKey};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::collection::upsert_card;
use crate::error::EconomyError;
use crate::resolver::validate_override;
use crate::season::rebirth;

const fn one() -> u32 {
    1
}

/// A debug action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DebugAction {
    /// Credit coins.
    AddCoins {
        /// Coins to add.
        amount: u64,
    },
    /// Overwrite the balance.
    SetCoins {
        /// New balance.
        amount: u64,
    },
    /// Set the tier boost level.
    SetTierBoostLevel {
        /// New level, clamped to the cap.
        level: u32,
    },
    /// Set the mutation level.
    SetMutationLevel {
        /// New level, clamped to the cap.
        level: u32,
    },
    /// Set the value level.
    SetValueLevel {
        /// New level, clamped to the cap.
        level: u32,
    },
    /// Retired name of [`DebugAction::SetValueLevel`].
    SetLuckLevel {
        /// New level, clamped to the cap.
        level: u32,
    },
    /// Set the auto speed level.
    SetAutoSpeedLevel {
        /// New level, clamped to the cap.
        level: u32,
    },
    /// Lock or unlock the auto opener.
    SetAutoUnlocked {
        /// New flag.
        enabled: bool,
    },
    /// Add copies of one card.
    GrantTerm {
        /// Card key.
        term_key: String,
        /// Copies to add, at least 1.
        #[serde(default = "one")]
        copies: u32,
        /// Mutation of the granted copies.
        #[serde(default)]
        mutation: Option<String>,
    },
    /// Own every catalog card, optionally setting the balance.
    GrantFullSet {
        /// New balance, unchanged when absent.
        #[serde(default)]
        coins: Option<u64>,
    },
    /// Store a one-shot override for the next draw.
    SetNextReward(DrawOverride),
    /// Buy an upgrade through the normal purchase rules.
    BuyUpgrade {
        /// Upgrade key, current or retired name.
        upgrade_key: String,
    },
    /// Rebirth through the normal rules.
    Rebirth,
    /// Reset the run, keeping profile, layer and history.
    ResetAccount,
}

impl DebugAction {
    /// Decode an action from JSON.
    ///
    /// # Errors
    ///
    /// [`EconomyError::UnknownDebugAction`] for a missing or unsupported
    /// `type`, or malformed fields.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, EconomyError> {
        Self::deserialize(value).map_err(|e| EconomyError::UnknownDebugAction { reason: e.to_string() })
    }

    /// Wire name of the action.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddCoins { .. } => "add_coins",
            Self::SetCoins { .. } => "set_coins",
            Self::SetTierBoostLevel { .. } => "set_tier_boost_level",
            Self::SetMutationLevel { .. } => "set_mutation_level",
            Self::SetValueLevel { .. } => "set_value_level",
            Self::SetLuckLevel { .. } => "set_luck_level",
            Self::SetAutoSpeedLevel { .. } => "set_auto_speed_level",
            Self::SetAutoUnlocked { .. } => "set_auto_unlocked",
            Self::GrantTerm { .. } => "grant_term",
            Self::GrantFullSet { .. } => "grant_full_set",
            Self::SetNextReward(_) => "set_next_reward",
            Self::BuyUpgrade { .. } => "buy_upgrade",
            Self::Rebirth => "rebirth",
            Self::ResetAccount => "reset_account",
        }
    }
}

/// Apply `action` to `state`. Authorization is the caller's job.
///
/// # Errors
///
/// Validation errors for unknown cards, mutations or upgrade keys, and the
/// usual purchase and rebirth preconditions.
pub fn apply_debug_action(
    config: &BalanceConfig,
    catalog: &Catalog,
    state: &mut PlayerEconomyState,
    action: &DebugAction,
    now: DateTime<Utc>,
) -> Result<(), EconomyError> {
    let clamp = |key: UpgradeKey, level: u32| level.min(upgrade_cap(config, key));

    match action {
        DebugAction::AddCoins { amount } => state.coins = state.coins.saturating_add(*amount),
        DebugAction::SetCoins { amount } => state.coins = *amount,
        DebugAction::SetTierBoostLevel { level } => {
            state.tier_boost_level = clamp(UpgradeKey::TierBoost, *level);
        }
        DebugAction::SetMutationLevel { level } => {
            state.mutation_level = clamp(UpgradeKey::MutationUpgrade, *level);
        }
        DebugAction::SetValueLevel { level } | DebugAction::SetLuckLevel { level } => {
            state.value_level = clamp(UpgradeKey::ValueUpgrade, *level);
        }
        DebugAction::SetAutoSpeedLevel { level } => {
            state.auto_speed_level = clamp(UpgradeKey::AutoSpeed, *level);
        }
        DebugAction::SetAutoUnlocked { enabled } => state.auto_unlocked = *enabled,
        DebugAction::GrantTerm {
            term_key,
            copies,
            mutation,
        } => {
            if !catalog.contains(term_key) {
                return Err(EconomyError::UnknownTerm { key: term_key.clone() });
            }
            let mutation = match mutation.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
                Some(name) => name.parse::<Mutation>().map_err(|_| EconomyError::UnknownName {
                    field: "mutation",
                    value: name.to_owned(),
                })?,
                None => Mutation::None,
            };
            upsert_card(state, term_key, (*copies).max(1), mutation, now);
        }
        DebugAction::GrantFullSet { coins } => {
            for card in catalog.cards() {
                if !state.collection.contains_key(&card.key) {
                    upsert_card(state, &card.key, 1, Mutation::None, now);
                }
            }
            if let Some(coins) = coins {
                state.coins = *coins;
            }
        }
        DebugAction::SetNextReward(raw) => {
            state.next_reward = Some(validate_override(catalog, raw)?);
        }
        DebugAction::BuyUpgrade { upgrade_key } => {
            let key = upgrade_key
                .parse::<UpgradeKey>()
                .map_err(|_| EconomyError::unknown_upgrade(upgrade_key))?;
            apply_upgrade(config, state, key)?;
        }
        DebugAction::Rebirth => {
            rebirth(config, catalog, state, now)?;
        }
        DebugAction::ResetAccount => state.reset_run(config.initial_coins, now),
    }

    state.highest_tier_unlocked = highest_unlocked_tier(config, state.tier_boost_level);
    state.updated_at = now;
    info!(action = action.name(), "debug action applied");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lucky_types::{Layer, Profile, SeasonWindow, StolenMarker, Tier};
    use serde_json::json;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
    }

    fn state() -> PlayerEconomyState {
        let profile = Profile {
            nick_part_a: "Coral".to_owned(),
            nick_part_b: "Rapid".to_owned(),
            nick_part_c: "Parser".to_owned(),
            display_name: "Coral Rapid Parser".to_owned(),
            name_customized: false,
            updated_at: at(0),
        };
        let season = SeasonWindow {
            id: "season-1969-12-29".to_owned(),
            starts_at: at(-259_200),
            ends_at: at(345_600),
        };
        PlayerEconomyState::new(profile, season, 0, at(0))
    }

    fn apply(s: &mut PlayerEconomyState, value: &serde_json::Value) -> Result<(), EconomyError> {
        let config = BalanceConfig::default();
        let catalog = Catalog::standard().unwrap();
        let action = DebugAction::from_json(value)?;
        apply_debug_action(&config, &catalog, s, &action, at(5))
    }

    #[test]
    fn decodes_tagged_actions() {
        let action = DebugAction::from_json(&json!({"type": "add_coins", "amount": 2000})).unwrap();
        assert_eq!(action, DebugAction::AddCoins { amount: 2000 });
        assert_eq!(action.name(), "add_coins");

        let action = DebugAction::from_json(&json!({"type": "set_next_reward", "tier": 2, "mutation": "holo"})).unwrap();
        assert_eq!(action.name(), "set_next_reward");

        let action = DebugAction::from_json(&json!({"type": "grant_term", "term_key": "hello_world"})).unwrap();
        assert_eq!(
            action,
            DebugAction::GrantTerm {
                term_key: "hello_world".to_owned(),
                copies: 1,
                mutation: None,
            }
        );
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        for value in [json!({"type": "summon_dragon"}), json!({"amount": 5})] {
            assert!(matches!(
                DebugAction::from_json(&value),
                Err(EconomyError::UnknownDebugAction { .. })
            ));
        }
    }

    #[test]
    fn coin_and_level_actions() {
        let mut s = state();
        apply(&mut s, &json!({"type": "add_coins", "amount": 2000})).unwrap();
        apply(&mut s, &json!({"type": "add_coins", "amount": 5})).unwrap();
        assert_eq!(s.coins, 2005);
        apply(&mut s, &json!({"type": "set_coins", "amount": 7})).unwrap();
        assert_eq!(s.coins, 7);

        apply(&mut s, &json!({"type": "set_tier_boost_level", "level": 99})).unwrap();
        assert_eq!(s.tier_boost_level, 20);
        assert_eq!(s.highest_tier_unlocked, Tier::LAST);

        apply(&mut s, &json!({"type": "set_luck_level", "level": 3})).unwrap();
        assert_eq!(s.value_level, 3);

        apply(&mut s, &json!({"type": "set_auto_unlocked", "enabled": true})).unwrap();
        assert!(s.auto_unlocked);
    }

    #[test]
    fn grant_term_validates_inputs() {
        let mut s = state();
        apply(&mut s, &json!({"type": "grant_term", "term_key": "hello_world", "copies": 4, "mutation": "foil"})).unwrap();
        let entry = s.collection.get("hello_world").unwrap();
        assert_eq!(entry.copies, 4);
        assert_eq!(entry.level, 2);
        assert_eq!(entry.best_mutation, Mutation::Foil);

        assert!(matches!(
            apply(&mut s, &json!({"type": "grant_term", "term_key": "nope"})),
            Err(EconomyError::UnknownTerm { .. })
        ));
        assert!(matches!(
            apply(&mut s, &json!({"type": "grant_term", "term_key": "hello_world", "mutation": "gold"})),
            Err(EconomyError::UnknownName { .. })
        ));
    }

    #[test]
    fn full_set_clears_stolen_and_sets_coins() {
        let mut s = state();
        s.stolen.push(StolenMarker {
            layer: Layer::BASE,
            term_key: "merge_conflict".to_owned(),
            stolen_at: at(1),
        });
        apply(&mut s, &json!({"type": "grant_full_set", "coins": 200_000})).unwrap();
        assert_eq!(s.coins, 200_000);
        assert_eq!(s.collection.len(), 60);
        assert!(s.stolen.is_empty());
    }

    #[test]
    fn next_reward_is_validated_before_storing() {
        let mut s = state();
        assert!(apply(&mut s, &json!({"type": "set_next_reward", "term_key": "ghost"})).is_err());
        assert!(s.next_reward.is_none());
        apply(&mut s, &json!({"type": "set_next_reward", "term_key": "hello_world", "mutation": "holo"})).unwrap();
        assert_eq!(s.next_reward.as_ref().and_then(|f| f.mutation), Some(Mutation::Holo));
    }

    #[test]
    fn buy_upgrade_uses_purchase_rules() {
        let mut s = state();
        assert!(matches!(
            apply(&mut s, &json!({"type": "buy_upgrade", "upgrade_key": "tier_boost"})),
            Err(EconomyError::Upgrade(_))
        ));
        assert!(matches!(
            apply(&mut s, &json!({"type": "buy_upgrade", "upgrade_key": "warp_drive"})),
            Err(EconomyError::UnknownName { .. })
        ));
        s.coins = 100;
        apply(&mut s, &json!({"type": "buy_upgrade", "upgrade_key": "luck_engine"})).unwrap();
        assert_eq!(s.value_level, 1);
        assert_eq!(s.coins, 60);
    }

    #[test]
    fn reset_account_clears_run() {
        let mut s = state();
        apply(&mut s, &json!({"type": "grant_full_set", "coins": 500})).unwrap();
        apply(&mut s, &json!({"type": "reset_account"})).unwrap();
        assert_eq!(s.coins, 0);
        assert!(s.collection.is_empty());
        assert_eq!(s.lifetime.len(), 60);
    }
}
